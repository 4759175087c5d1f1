//! Usage text

use crate::config::defaults::TOOL_NAME;

/// Render the command syntax help
pub fn render() -> String {
    format!(
        "\
USAGE:

  {TOOL_NAME} [OPTIONS] <specfile>

MISCELLANEOUS OPTIONS:

  -h, --help               Print this help message and exit.
  --list-deps              List build dependencies and exit.
  --work-dir=<dir>         Run the build inside the given directory.
  --release=<release>      Build against the given release
                           (default: the most recent release).

PACKAGE BUILD OPTIONS:

  -u, --unpack             Retrieve the sources.
  -p, --prepare            Unpack and run the prepare step.
  -b, --build              Prepare and compile the sources.
  -i, --install            Build and install into the install tree.
  -r, --repackage          Package an existing install tree.
  -o, --outdir=<dir>       Place generated packages in <dir>.
  --ignore-deps            Do not fail on missing build dependencies.
  --no-debug-pkgs          Do not generate debug packages.
  --force-local            Only use sources from the local cache.

FILTER OPTIONS:

  --enable-packages=<list>   Comma-separated list of binary packages to
                             generate; all others are skipped.
  --disable-packages=<list>  Comma-separated list of binary packages to
                             skip.
  --build-for=<what>         Build for target, tools or cross-tools
                             (default: target).
"
    )
}

//! Static metadata for the hanif formula.

/// Declarative description of the packaged tool.
#[derive(Debug, Clone, Copy)]
pub struct Formula {
    pub name: &'static str,
    pub version: &'static str,
    pub desc: &'static str,
    pub homepage: &'static str,
    pub license: &'static str,
    /// Runtime dependencies resolved to absolute paths at install time.
    pub dependencies: &'static [&'static str],
}

pub const HANIF: Formula = Formula {
    name: "hanif",
    version: "1.0.0",
    desc: "Simple, extensible CLI for daily workflows",
    homepage: "https://github.com/hanif-mianjee/hanif-cli-tools",
    license: "MIT",
    dependencies: &["bash", "git"],
};

/// Post-install caveats shown to the user.
pub fn caveats() -> String {
    format!(
        "Hanif CLI has been installed!\n\
         \n\
         Get started:\n\
         \x20 hanif help\n\
         \x20 hanif git nf \"my feature\"\n\
         \n\
         Documentation:\n\
         \x20 {}\n",
        HANIF.homepage
    )
}

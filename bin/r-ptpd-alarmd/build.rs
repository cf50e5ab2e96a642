//! ---
//! ptpd_section: "04-daemon"
//! ptpd_subsection: "binary"
//! ptpd_type: "source"
//! ptpd_scope: "code"
//! ptpd_description: "Build script embedding version metadata into the alarm daemon."
//! ptpd_version: "v0.0.0-prealpha"
//! ptpd_owner: "tbd"
//! ---
use vergen::EmitBuilder;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Source tarballs carry no git metadata; vergen falls back to defaults.
    EmitBuilder::builder()
        .build_timestamp()
        .all_cargo()
        .all_git()
        .emit()?;
    println!("cargo:rerun-if-changed=build.rs");
    Ok(())
}

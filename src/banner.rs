//! Startup banner for `parley` (relay mode).

use crate::consts::{AUTHOR, HOMEPAGE, REPO};

/// Relay configuration for display in the startup banner.
pub struct BannerInfo<'a> {
    pub addr: &'a str,
    pub model: &'a str,
    pub api_base: &'a str,
    pub key_status: &'a str,
}

pub fn render_banner(info: &BannerInfo) -> String {
    format!(
        r#"
   ╔═══════════════════════════════════════╗
   ║             P A R L E Y               ║
   ║     a voice, lent to a question       ║
   ╚═══════════════════════════════════════╝

   version   {}
   by        {}
   home      {}
   repo      {}
   listen    http://{}
   model     {}
   upstream  {}
   api key   {}
"#,
        env!("CARGO_PKG_VERSION"),
        AUTHOR,
        HOMEPAGE,
        REPO,
        info.addr,
        info.model,
        info.api_base,
        info.key_status,
    )
}

pub fn print_banner(info: &BannerInfo) {
    println!("{}", render_banner(info));
}

//! `toc`: markdown table of contents of the configured crates.

use std::path::Path;

use crate::config::Config;
use crate::toc::TableOfContents;

pub fn table_of_contents(config: &Config) -> TableOfContents {
    let mut toc = TableOfContents::new();
    for page in &config.pages {
        toc.insert(
            page.manifest_path.as_deref().map(Path::new),
            &page.krate,
            !page.inputs.verifications.is_empty(),
        );
    }
    toc
}

pub fn print_toc(config: &Config) {
    if config.pages.is_empty() {
        crate::log!("toc"; "no pages configured");
        return;
    }
    print!("{}", table_of_contents(config).to_md());
}

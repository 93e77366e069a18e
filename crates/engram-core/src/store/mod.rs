//! File Store — Markdown+YAML-frontmatter parse/emit, directory scan, atomic write.

mod frontmatter;
mod markdown;
mod yaml;

pub use frontmatter::{neurona_from_document, render_document, split_document};
pub use markdown::{
    find_neurona_path, is_neurona_file, latest_modification_time, list_neurona_files,
    read_neurona, read_neurona_with_body, read_neurona_with_parts, scan_neuronas, write_neurona,
};
pub use yaml::YamlNode;

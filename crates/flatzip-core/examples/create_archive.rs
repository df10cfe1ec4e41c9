//! Example: Creating archives with flatzip-core
//!
//! Run with: `cargo run --example create_archive`

use flatzip_core::Archiver;
use flatzip_core::UnicodeExtraFieldPolicy;
use flatzip_core::create_archive;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let workdir = tempfile::tempdir()?;
    let notes = workdir.path().join("notes.txt");
    let cafe = workdir.path().join("café.txt");
    std::fs::write(&notes, "Hello, flatzip!")?;
    std::fs::write(&cafe, "crème brûlée")?;

    // Example 1: Simple creation with default config
    println!("Example 1: Simple creation");
    let archive = create_archive(&[&notes, &cafe])?;
    println!("  Created {}", archive.display());

    // The caller owns the archive
    std::fs::remove_file(&archive)?;

    // Example 2: Builder pattern with options
    println!("\nExample 2: Builder pattern");
    let created = Archiver::new()
        .add_path(&notes)
        .add_path(workdir.path())
        .buffer_size(8 * 1024)
        .temp_dir(workdir.path())
        .unicode_extra_field(UnicodeExtraFieldPolicy::Never)
        .create()?;
    println!(
        "  Created ZIP with {} entries, skipped {}",
        created.report.entries_added,
        created.report.files_skipped()
    );
    println!(
        "  Compression ratio: {:.2}",
        created.report.compression_ratio()
    );

    println!("\nExamples completed successfully!");
    Ok(())
}

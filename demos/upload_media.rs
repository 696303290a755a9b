//! Example: Register a media file, upload its bytes, and place it on a page
//!
//! Run with: cargo run --example upload_media -- <exposition> <username> <password> <file>

use rcedit::{RcClient, Rect};
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let (Some(exposition), Some(username), Some(password), Some(file)) =
        (args.next(), args.next(), args.next(), args.next())
    else {
        eprintln!("usage: upload_media <exposition> <username> <password> <file>");
        std::process::exit(2);
    };
    let path = Path::new(&file);
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("upload");

    let mut rc = RcClient::new(exposition)?;
    rc.login(&username, &password)?;

    let media_id = rc.media_add(name, &username, "image", "all-rights-reserved", "", None)?;
    println!("Registered media {} as {}", name, media_id);

    rc.media_upload(&media_id, path)?;
    println!("Uploaded {}", path.display());

    // Place it on the first page of the exposition
    let pages = rc.page_list()?;
    if let Some((page_id, title)) = pages.iter().next() {
        let item_id = rc.item_add(page_id, &media_id, Rect::new(50, 50, 400, 300), "picture")?;
        println!("Placed item {} on page {}", item_id, title);
    } else {
        println!("Exposition has no pages, nothing to place the media on");
    }

    rc.logout()?;
    Ok(())
}

//! Example: List the pages, media sets and media files of an exposition
//!
//! Run with: cargo run --example list_pages -- <exposition> <username> <password>

use rcedit::RcClient;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let (Some(exposition), Some(username), Some(password)) =
        (args.next(), args.next(), args.next())
    else {
        eprintln!("usage: list_pages <exposition> <username> <password>");
        std::process::exit(2);
    };

    let mut rc = RcClient::new(exposition)?;
    rc.login(&username, &password)?;

    let pages = rc.page_list()?;
    println!("=== Pages ({}) ===", pages.len());
    for (id, title) in &pages {
        println!("  {} {}", id, title);
    }

    let sets = rc.mediaset_list()?;
    println!("\n=== Media sets ({}) ===", sets.len());
    for (id, title) in &sets {
        println!("  {} {}", id, title);
    }

    if !pages.is_empty() {
        let media = rc.media_list(None)?;
        println!("\n=== Simple media ({}) ===", media.len());
        for (id, entry) in &media {
            println!("  {} [{}] {}", id, entry.tool, entry.title);
        }

        for (page_id, title) in &pages {
            let items = rc.item_list(page_id)?;
            println!("\n=== Items on {} ({}) ===", title, items.len());
            for (id, entry) in &items {
                println!("  {} [{}] {}", id, entry.tool, entry.title);
            }
        }
    }

    rc.logout()?;
    Ok(())
}

// Build a tree from 1..=N and print its shape and metrics.
//
//   cargo run --example tree_shape -- [N]
//
// N defaults to 10. The log level is read from REDOAK_LOG (default `info`),
// `trace` shows every fixup case and rotation taken.

use std::env;
use std::error::Error;

use redoak::RedBlackTree;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

const DEFAULT_COUNT: u32 = 10;

fn initialize_logging() -> Result<(), Box<dyn Error>> {
    let level = match env::var("REDOAK_LOG") {
        Ok(level) => level.parse::<LevelFilter>()?,
        Err(_) => LevelFilter::Info,
    };
    TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    initialize_logging()?;

    let count = match env::args().nth(1) {
        Some(arg) => arg.parse::<u32>()?,
        None => DEFAULT_COUNT,
    };
    log::info!("inserting keys 1..={}", count);

    let mut tree = RedBlackTree::with_capacity(count as usize);
    for key in 1..=count {
        tree.insert(key);
    }

    let keys: Vec<String> = tree.iter().map(u32::to_string).collect();
    println!("Inorder Traversal of Tree:");
    println!("{}\n", keys.join(", "));

    println!("Tree Structure:");
    print!("{tree}");

    println!("\nTree Info:");
    println!("Size of Tree : {}", tree.len());
    println!("Height of Tree : {}", tree.height());
    println!("Black Height of Tree : {}", tree.black_height());

    Ok(())
}

//! Simple CLI for exercising the B-tree index.
//!
//! Usage:
//!   btree_cli [--min-degree <t> | --config <file>] demo
//!   btree_cli [--min-degree <t> | --config <file>] bulk_insert <count>
//!   btree_cli [--min-degree <t> | --config <file>] repl
//!
//! The tree lives in memory only; `repl` reads one command per line from
//! stdin:
//!   put <key> <value> | get <key> | delete <key> | scan | stats | dump | json

use btree_index::{BTree, BTreeConfig, IndexError, Result};
use std::env;
use std::io::{self, BufRead};
use std::process::exit;

type Tree = BTree<i64, String>;

fn usage() -> ! {
    eprintln!("Usage: btree_cli [--min-degree <t> | --config <file>] <command> [args...]");
    eprintln!("Commands:");
    eprintln!("  demo                - Insert 0..9, look up and delete keys, dumping the tree");
    eprintln!("  bulk_insert <count> - Insert count test records and report timing");
    eprintln!("  repl                - Read put/get/delete/scan/stats/dump/json from stdin");
    exit(1);
}

/// Split leading options from the command and its arguments
fn parse_config(args: &[String]) -> Result<(BTreeConfig, usize)> {
    let mut config = BTreeConfig::default();
    let mut pos = 1;

    while pos < args.len() && args[pos].starts_with("--") {
        let value = args
            .get(pos + 1)
            .ok_or_else(|| IndexError::invalid_config(format!("{} expects a value", args[pos])))?;

        config = match args[pos].as_str() {
            "--min-degree" => {
                let min_degree = value.parse().map_err(|_| {
                    IndexError::invalid_config(format!("invalid minimum degree: {}", value))
                })?;
                BTreeConfig::new(min_degree)?
            }
            "--config" => BTreeConfig::from_file(value)?,
            other => return Err(IndexError::invalid_config(format!("unknown option: {}", other))),
        };
        pos += 2;
    }

    Ok((config, pos))
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let (config, pos) = match parse_config(&args) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            exit(1);
        }
    };
    let command = match args.get(pos) {
        Some(command) => command.as_str(),
        None => usage(),
    };

    let mut tree: Tree = match BTree::with_config(&config) {
        Ok(tree) => tree,
        Err(e) => {
            eprintln!("ERROR: Failed to create tree: {}", e);
            exit(1);
        }
    };

    match command {
        "demo" => run_demo(&mut tree),

        "bulk_insert" => {
            let count: i64 = match args.get(pos + 1).map(|s| s.parse()) {
                Some(Ok(n)) => n,
                _ => {
                    eprintln!("ERROR: Invalid count");
                    exit(1);
                }
            };

            let start = std::time::Instant::now();
            for i in 0..count {
                tree.insert(i, format!("value_{}", i));
            }
            let elapsed = start.elapsed();

            let ops_per_sec = count as f64 / elapsed.as_secs_f64();
            println!("INSERTED: {}", count);
            println!("HEIGHT: {}", tree.height());
            println!("TIME_MS: {}", elapsed.as_millis());
            println!("OPS_PER_SEC: {:.0}", ops_per_sec);

            if let Err(e) = tree.check_invariants() {
                eprintln!("ERROR: {}", e);
                exit(1);
            }
        }

        "repl" => {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        eprintln!("ERROR: {}", e);
                        exit(1);
                    }
                };
                run_line(&mut tree, line.trim());
            }
        }

        _ => {
            eprintln!("Unknown command: {}", command);
            exit(1);
        }
    }
}

fn run_demo(tree: &mut Tree) {
    for i in 0..10 {
        tree.insert(i, format!("value {}", i));
    }
    print!("{}", tree);

    for key in [7, 3] {
        match tree.get(&key) {
            Some(value) => println!("Find key {}: {}", key, value),
            None => println!("Find key {}: NOT_FOUND", key),
        }
    }

    for key in [3, 7] {
        println!("Deleted key {}: {}", key, tree.delete(&key));
        println!("After delete");
        print!("{}", tree);
    }
}

fn run_line(tree: &mut Tree, line: &str) {
    let mut parts = line.splitn(3, ' ');
    let command = parts.next().unwrap_or("");
    let key = parts.next().map(str::parse::<i64>);

    match (command, key) {
        ("", _) => {}

        ("put", Some(Ok(key))) => match parts.next() {
            Some(value) => match tree.insert(key, value.to_string()) {
                Some(_) => println!("UPDATED"),
                None => println!("OK"),
            },
            None => eprintln!("Usage: put <key> <value>"),
        },

        ("get", Some(Ok(key))) => match tree.get(&key) {
            Some(value) => println!("{}", value),
            None => println!("NOT_FOUND"),
        },

        ("delete", Some(Ok(key))) => {
            if tree.delete(&key) {
                println!("DELETED");
            } else {
                println!("NOT_FOUND");
            }
        }

        ("put" | "get" | "delete", _) => eprintln!("ERROR: {} expects an integer key", command),

        ("scan", _) => {
            println!("COUNT: {}", tree.len());
            for (key, value) in tree.iter() {
                println!("{} -> {}", key, value);
            }
        }

        ("stats", _) => {
            println!("len: {}", tree.len());
            println!("tree_height: {}", tree.height());
            println!("min_degree: {}", tree.min_degree());
        }

        ("dump", _) => print!("{}", tree),

        ("json", _) => match serde_json::to_string_pretty(&tree.export_tree()) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("ERROR: {}", e),
        },

        _ => eprintln!("Unknown command: {}", command),
    }
}

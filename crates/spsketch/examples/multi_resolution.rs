//! Sketch one matrix at several resolutions
//!
//! Builds the adjacency structure of a random preferential-attachment tree
//! and prints its block counts at three resolutions, coarsest first.
//!
//! ```text
//! RUST_LOG=spsketch_core=debug cargo run --example multi_resolution
//! ```

use anyhow::Result;
use spsketch::prelude::*;

/// Symmetric adjacency of a tree where node `i` attaches to a node `< i`,
/// favouring low ids
fn tree_adjacency(nodes: usize) -> (Vec<u32>, Vec<u32>) {
    let mut neighbours = vec![Vec::new(); nodes];
    let mut seed = 2024u64;
    for child in 1..nodes {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let r = (seed >> 33) as usize;
        let parent = (r % child) * (r % child) / child;
        neighbours[child].push(parent as u32);
        neighbours[parent].push(child as u32);
    }

    let mut row_ptr = vec![0u32];
    let mut cols = Vec::new();
    for mut row in neighbours {
        row.sort_unstable();
        cols.extend(row);
        row_ptr.push(cols.len() as u32);
    }
    (row_ptr, cols)
}

fn print_sketch(sketch: &Sketch) {
    println!(
        "n = {} (block size {}, {} of {} blocks occupied)",
        sketch.resolution(),
        sketch.block_size(),
        sketch.occupied_blocks(),
        sketch.resolution() * sketch.resolution()
    );
    let width = sketch.max_count().to_string().len();
    for row in sketch.rows() {
        let line: Vec<String> = row.iter().map(|c| format!("{c:>width$}")).collect();
        println!("  {}", line.join(" "));
    }
}

fn main() -> Result<()> {
    init_tracing(TracingConfig::default())?;

    let nodes = 100u32;
    let (row_ptr, cols) = tree_adjacency(nodes as usize);
    let csr = CsrStructure::new(&row_ptr, &cols, nodes)?;
    let sketcher = Sketcher::new(SketchConfig::from_env()).with_progress(LogProgress);

    for n in [10u32, 25, 50] {
        let sketch = sketcher.sketch(&csr, n)?;
        assert_eq!(sketch.total(), csr.nnz() as u64);
        if n <= 25 {
            print_sketch(&sketch);
        } else {
            println!("n = {n}: max block count {}", sketch.max_count());
        }
    }

    Ok(())
}

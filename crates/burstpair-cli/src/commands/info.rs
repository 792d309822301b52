use std::path::PathBuf;

use anyhow::{Context, Result};
use burstpair_core::consts::DEFAULT_INPUT_EXTENSIONS;
use burstpair_core::io::image_io::load_image;
use burstpair_core::io::sequence::list_inputs;
use clap::Args;

#[derive(Args)]
pub struct InfoArgs {
    /// Input directory
    pub dir: PathBuf,

    /// Comma-separated input extensions
    #[arg(long, value_delimiter = ',')]
    pub extensions: Option<Vec<String>>,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let extensions = args.extensions.clone().unwrap_or_else(|| {
        DEFAULT_INPUT_EXTENSIONS
            .iter()
            .map(|s| s.to_string())
            .collect()
    });
    let paths = list_inputs(&args.dir, &extensions)
        .with_context(|| format!("Failed to list {}", args.dir.display()))?;

    println!("Directory:   {}", args.dir.display());
    println!("Extensions:  {}", extensions.join(", "));
    println!("Files:       {}", paths.len());
    println!();

    let mut decoded = 0usize;
    let mut reference_dims = None;
    for path in &paths {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match load_image(path) {
            Ok(frame) => {
                let dims = (frame.width(), frame.height());
                let note = match reference_dims {
                    None => {
                        reference_dims = Some(dims);
                        "  (reference)"
                    }
                    Some(r) if r != dims => "  (size differs, will be skipped)",
                    Some(_) => "",
                };
                println!("  [{decoded:>3}] {name}  {}x{}{note}", dims.0, dims.1);
                decoded += 1;
            }
            Err(e) => println!("  [ - ] {name}  decode failed: {e}"),
        }
    }

    println!();
    println!("Decodable:   {decoded}/{}", paths.len());
    Ok(())
}

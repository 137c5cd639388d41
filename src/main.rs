use charmap_compiler::{CompileOptions, ParseMode, TableShape, Variant};
use std::env;
use std::fs;

const SHAPES: &str = "sbcs, dbcs, dbcs-euc, euc-tw, hkscs, hkscs-2001, jis0213";

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 5 {
        eprintln!(
            "Usage: {} <shape> <src-dir> <name> <out-file> [--strict|--diagnostic]",
            args[0]
        );
        eprintln!("  shapes: {}", SHAPES);
        std::process::exit(1);
    }

    let Some(shape) = TableShape::from_name(&args[1]) else {
        eprintln!("ERROR: Unknown shape {:?}. Expected one of: {}", args[1], SHAPES);
        std::process::exit(1);
    };
    let src_dir = &args[2];
    let variant = Variant::new(args[3].as_str(), shape);
    let out_path = &args[4];

    let mut options = CompileOptions::default();
    for flag in &args[5..] {
        options.parse_mode = match flag.as_str() {
            "--strict" => ParseMode::Strict,
            "--diagnostic" => ParseMode::Diagnostic,
            other => {
                eprintln!("ERROR: Unknown flag {:?}", other);
                std::process::exit(1);
            }
        };
    }

    // Build everything in memory first so a failed build never leaves a partial file.
    let artifact = match variant.emit(src_dir, &options) {
        Ok(artifact) => artifact,
        Err(e) => {
            eprintln!("ERROR: Failed to compile {}", variant.name);
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    };

    let mut bytes = Vec::with_capacity(artifact.size());
    let written = artifact
        .write_to(&mut bytes)
        .and_then(|()| fs::write(out_path, &bytes).map_err(Into::into));
    if let Err(e) = written {
        eprintln!("ERROR: Failed to write {}", out_path);
        eprintln!("  {}", e);
        std::process::exit(1);
    }

    println!("{} ({}) -> {} ({} bytes)", variant.name, shape, out_path, bytes.len());
}

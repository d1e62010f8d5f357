//! Check system capabilities.

use rallycut_export::probe::command_exists;

pub fn run() -> anyhow::Result<()> {
    println!("RallyCut System Check");
    println!("{}", "=".repeat(50));

    let mut all_ok = true;
    for (binary, purpose) in [
        ("ffmpeg", "lossless clip extraction"),
        ("ffprobe", "video duration and dimension probing"),
    ] {
        if command_exists(binary) {
            println!("[OK] {binary}: available ({purpose})");
        } else {
            println!("[MISSING] {binary}: not found in PATH ({purpose})");
            all_ok = false;
        }
    }

    println!();
    if all_ok {
        println!("All required tools are available. RallyCut is ready.");
    } else {
        println!("Some required tools are missing. Install ffmpeg to fix both.");
    }

    Ok(())
}

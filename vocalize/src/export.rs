//! Export helpers: playlist, combined audio, and the run manifest.
//!
//! All exports walk the completed subset of the ledger in sequence order,
//! so the output is deterministic for a given run.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::convert::RunLedger;

/// Write an M3U playlist over the completed chunks.
pub fn write_playlist(ledger: &RunLedger, output_dir: &Path, title: &str) -> Result<PathBuf> {
    let playlist_path = output_dir.join(format!("{}.m3u", title));
    let file = File::create(&playlist_path).context("Failed to create playlist file")?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "#EXTM3U")?;
    writeln!(writer, "#PLAYLIST:{}", title)?;
    writeln!(writer)?;

    for chunk in ledger.completed() {
        let Some(artifact) = &chunk.artifact else {
            continue;
        };
        let file_name = artifact
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        writeln!(writer, "#EXTINF:-1,Part {}", chunk.sequence)?;
        writeln!(writer, "{}", file_name)?;
    }

    writer.flush()?;
    Ok(playlist_path)
}

/// Concatenate the completed chunk audio into a single file, in sequence
/// order.
pub fn combine_audio(ledger: &RunLedger, output_path: &Path) -> Result<()> {
    let completed: Vec<_> = ledger.completed().collect();
    if completed.is_empty() {
        anyhow::bail!("No completed audio chunks to combine");
    }

    let out = File::create(output_path).context("Failed to create combined output file")?;
    let mut writer = BufWriter::new(out);

    for chunk in completed {
        let Some(artifact) = &chunk.artifact else {
            continue;
        };
        let mut reader = File::open(&artifact.path).with_context(|| {
            format!("Failed to open chunk audio: {}", artifact.path.display())
        })?;
        std::io::copy(&mut reader, &mut writer)?;
    }

    writer.flush()?;
    Ok(())
}

/// Save the run ledger as JSON next to the audio output.
pub fn write_manifest(ledger: &RunLedger, output_dir: &Path) -> Result<PathBuf> {
    let manifest_path = output_dir.join("manifest.json");
    let file = File::create(&manifest_path).context("Failed to create manifest file")?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, ledger).context("Failed to write manifest JSON")?;
    Ok(manifest_path)
}

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use anyhow::{anyhow, bail, Context, Result};
use glam::Vec2;
use touch_gestures::{EventKind, PointerSample, TouchPhase};

const POINTER_HEADER: &str = "pointer,ms,id,phase,x,y,dx,dy";
const MOUSE_HEADER: &str = "mouse,ms,down,x,y";

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ReplayInput {
    Pointer(PointerSample),
    Mouse { down: bool, cursor: Vec2 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReplayRow {
    pub ms: u64,
    pub input: ReplayInput,
}

pub fn parse_trace(path: &Path) -> Result<Vec<ReplayRow>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut out = Vec::new();
    for (line_no, line_result) in reader.lines().enumerate() {
        let line_no = line_no + 1;
        let line =
            line_result.with_context(|| format!("failed to read {}:{}", path.display(), line_no))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if trimmed == POINTER_HEADER || trimmed == MOUSE_HEADER {
            continue;
        }

        let row = parse_row(trimmed)
            .with_context(|| format!("{}:{} invalid trace line", path.display(), line_no))?;
        out.push(row);
    }

    Ok(out)
}

fn parse_row(line: &str) -> Result<ReplayRow> {
    let parts: Vec<&str> = line.split(',').map(str::trim).collect();
    match parts[0] {
        "pointer" => {
            if parts.len() != 8 {
                bail!("expected 8 columns for pointer row, got {}", parts.len());
            }
            let ms = parse_field::<u64>(parts[1], "ms")?;
            let id = parse_field::<u64>(parts[2], "id")?;
            let phase = parse_phase(parts[3])?;
            let position = Vec2::new(
                parse_field::<f32>(parts[4], "x")?,
                parse_field::<f32>(parts[5], "y")?,
            );
            let delta = Vec2::new(
                parse_field::<f32>(parts[6], "dx")?,
                parse_field::<f32>(parts[7], "dy")?,
            );
            Ok(ReplayRow {
                ms,
                input: ReplayInput::Pointer(PointerSample::new(id, phase, position, delta)),
            })
        }
        "mouse" => {
            if parts.len() != 5 {
                bail!("expected 5 columns for mouse row, got {}", parts.len());
            }
            let ms = parse_field::<u64>(parts[1], "ms")?;
            let down = match parts[2] {
                "1" | "true" | "down" => true,
                "0" | "false" | "up" => false,
                other => bail!("invalid down '{other}'"),
            };
            let cursor = Vec2::new(
                parse_field::<f32>(parts[3], "x")?,
                parse_field::<f32>(parts[4], "y")?,
            );
            Ok(ReplayRow {
                ms,
                input: ReplayInput::Mouse { down, cursor },
            })
        }
        other => bail!("unknown row type '{other}'"),
    }
}

fn parse_phase(raw: &str) -> Result<TouchPhase> {
    match raw.to_ascii_lowercase().as_str() {
        "began" => Ok(TouchPhase::Began),
        "moved" => Ok(TouchPhase::Moved),
        "stationary" => Ok(TouchPhase::Stationary),
        "ended" => Ok(TouchPhase::Ended),
        "canceled" | "cancelled" => Ok(TouchPhase::Canceled),
        other => Err(anyhow!("invalid phase '{other}'")),
    }
}

fn parse_field<T>(raw: &str, field: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.parse::<T>()
        .with_context(|| format!("invalid {field} '{raw}'"))
}

pub fn parse_expected_kinds(path: &Path) -> Result<Vec<EventKind>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut kinds = Vec::new();
    for (line_no, line_result) in reader.lines().enumerate() {
        let line_no = line_no + 1;
        let line =
            line_result.with_context(|| format!("failed to read {}:{}", path.display(), line_no))?;
        let token = line.trim();
        if token.is_empty() || token.starts_with('#') {
            continue;
        }

        let kind = EventKind::from_label(token).ok_or_else(|| {
            anyhow!(
                "{}:{} invalid expected event kind: {}",
                path.display(),
                line_no,
                token
            )
        })?;
        kinds.push(kind);
    }

    Ok(kinds)
}

//! Drawing a page to its output.
//!
//! | Output | Surface | Result |
//! |--------|---------|--------|
//! | PNG | [`RasterSurface`] over a [`Framebuffer`] | 480x800 grayscale image |
//! | Dry run | [`RecordingSurface`] | one draw call per line on stdout |

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use inkboard_common::config::{HEIGHT, WIDTH};
use inkboard_common::{DrawOp, Page, RasterSurface, RecordingSurface, RenderContext};
use tracing::{debug, info};

use crate::framebuffer::Framebuffer;

/// Where a render goes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Output {
    Png(PathBuf),
    DryRun,
}

/// Rasterize `page` into a fresh page buffer.
pub fn rasterize(
    page: Page,
    ctx: &RenderContext<'_>,
) -> Framebuffer {
    let mut surface = RasterSurface::new(Framebuffer::new(WIDTH, HEIGHT));
    let offset = page.draw(&mut surface, ctx);
    debug!(page = page.name(), offset, "page rasterized");
    surface.into_inner()
}

/// Record the draw calls `page` makes.
pub fn record(
    page: Page,
    ctx: &RenderContext<'_>,
) -> Vec<DrawOp> {
    let mut surface = RecordingSurface::new();
    page.draw(&mut surface, ctx);
    surface.into_ops()
}

/// Write one line per draw call.
pub fn write_ops<W: Write>(
    out: &mut W,
    ops: &[DrawOp],
) -> std::io::Result<()> {
    for op in ops {
        writeln!(out, "{op}")?;
    }
    out.flush()
}

fn write_png(
    page: Page,
    ctx: &RenderContext<'_>,
    path: &Path,
) -> anyhow::Result<()> {
    let framebuffer = rasterize(page, ctx);
    framebuffer.save_png(path)?;
    info!(page = page.name(), path = %path.display(), ink = framebuffer.ink_count(), "page written");
    Ok(())
}

/// Render `page` to `output`.
pub fn render(
    page: Page,
    ctx: &RenderContext<'_>,
    output: &Output,
) -> anyhow::Result<()> {
    match output {
        Output::Png(path) => write_png(page, ctx, path),
        Output::DryRun => {
            let ops = record(page, ctx);
            info!(page = page.name(), ops = ops.len(), "dry run");
            write_ops(&mut std::io::stdout().lock(), &ops).context("writing draw calls to stdout")
        }
    }
}

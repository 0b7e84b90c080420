// Copyright 2026 the Gsplat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless

// The following lints are part of the Linebender standard set,
// but resolving them has been deferred for now.
// Feel free to send a PR that solves one or more of these.
#![allow(
    clippy::cast_possible_truncation,
    clippy::allow_attributes_without_reason
)]

use anyhow::{bail, Context, Result};
use clap::Parser;
use gsplat::{FrameParams, ProjectedPoints, Rasterizer, RasterizerOptions};
use gsplat_layout::{
    BinningState, ChunkState, Float2, Float4, GeometryState, ImageState, LayoutOptions,
    DEFAULT_ALIGNMENT, DEFAULT_SLACK,
};

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    if args.points == 0 {
        bail!("At least one point is needed");
    }
    let options = RasterizerOptions {
        layout: LayoutOptions {
            alignment: args.alignment,
            slack: args.slack,
        },
        tile_width: args.tile_size,
        tile_height: args.tile_size,
    };
    let mut rasterizer = Rasterizer::new(options).context("invalid rasterizer options")?;
    let params = FrameParams {
        width: args.width,
        height: args.height,
    };
    let splats = SyntheticSplats::grid(args.points, params, args.radius);
    log::info!(
        "Binning {} splats of radius {} into a {}x{} frame",
        args.points,
        args.radius,
        args.width,
        args.height
    );
    let stats = rasterizer.bin_frame(params, &splats.points())?.stats;

    let layout = &options.layout;
    println!("{}", GeometryState::describe(stats.num_points, layout)?.0);
    println!("{}", BinningState::describe(stats.num_rendered, layout)?.0);
    println!(
        "{}",
        ImageState::describe(args.width as usize * args.height as usize, layout)?.0
    );
    println!(
        "{} instances over {} tiles; {} bytes held ({} + {} + {} required)",
        stats.num_rendered,
        stats.tile_count,
        rasterizer.allocated_bytes(),
        stats.geometry_bytes,
        stats.binning_bytes,
        stats.image_bytes
    );
    Ok(())
}

#[derive(Parser, Debug)]
#[command(about, long_about = None, bin_name="cargo run -p headless --")]
struct Args {
    /// Number of splats to bin
    #[arg(long, short, default_value_t = 1024)]
    points: usize,
    #[arg(long, default_value_t = 1280)]
    width: u32,
    #[arg(long, default_value_t = 720)]
    height: u32,
    /// Screen-space radius of every splat, in pixels
    #[arg(long, short, default_value_t = 12)]
    radius: i32,
    /// Tile edge length, in pixels
    #[arg(long, default_value_t = gsplat::cpu::TILE_WIDTH)]
    tile_size: u32,
    /// Alignment of every field in the chunk states
    #[arg(long, default_value_t = DEFAULT_ALIGNMENT)]
    alignment: usize,
    /// Padding added to each chunk so it can be carved at any base address
    #[arg(long, default_value_t = DEFAULT_SLACK)]
    slack: usize,
}

/// Splats laid out on a regular grid, alternating in depth.
struct SyntheticSplats {
    depths: Vec<f32>,
    means2d: Vec<Float2>,
    radii: Vec<i32>,
    conic_opacity: Vec<Float4>,
}

impl SyntheticSplats {
    fn grid(count: usize, params: FrameParams, radius: i32) -> Self {
        let columns = (count as f64).sqrt().ceil() as usize;
        let rows = count.div_ceil(columns);
        let step_x = params.width as f32 / columns as f32;
        let step_y = params.height as f32 / rows as f32;
        // Three sigma at the given radius.
        let variance = (radius.max(1) as f32 / 3.0).powi(2);
        let inv = 1.0 / variance;
        let mut splats = Self {
            depths: Vec::with_capacity(count),
            means2d: Vec::with_capacity(count),
            radii: vec![radius; count],
            conic_opacity: vec![Float4::new(inv, 0.0, inv, 0.7); count],
        };
        for ix in 0..count {
            let (column, row) = (ix % columns, ix / columns);
            splats.means2d.push(Float2::new(
                (column as f32 + 0.5) * step_x,
                (row as f32 + 0.5) * step_y,
            ));
            splats.depths.push(1.0 + (ix % 7) as f32);
        }
        splats
    }

    fn points(&self) -> ProjectedPoints<'_> {
        ProjectedPoints {
            depths: &self.depths,
            means2d: &self.means2d,
            radii: &self.radii,
            conic_opacity: &self.conic_opacity,
        }
    }
}

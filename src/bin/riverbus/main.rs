use std::fs::File;
use std::io::{prelude::*, BufReader, BufWriter};

use anyhow::{anyhow, Context};
use clap::Parser;
use riverbus::design::rules::AccessRules;
use riverbus::format::design::JsonDesign;
use riverbus::river::{selection::WireSelection, River, RiverOptions};

mod cli;
use cli::Cli;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Cli::parse();

    let design_file = File::open(&args.input)
        .with_context(|| format!("cannot open {}", args.input.display()))?;
    let json = JsonDesign::load(BufReader::new(design_file))?;
    let mut design = json.make_design()?;

    let layer = match &args.layer {
        Some(name) => Some(
            design
                .rules()
                .layer(name)
                .ok_or_else(|| anyhow!("unknown layer {}", name))?,
        ),
        None => None,
    };
    let options = RiverOptions {
        layer,
        width: args.width,
        space: args.space,
        clearance: args.clearance,
    };
    let selection: WireSelection = args.wires.iter().cloned().collect();

    let plan = River::new(&design, options).route(&selection)?;

    if args.dry_run {
        let mut stdout = std::io::stdout().lock();
        let layername = design.rules().layername(plan.layer()).unwrap_or("?");

        writeln!(stdout, "height {}", plan.height())?;
        for segment in plan.segments() {
            writeln!(
                stdout,
                "{} {} ({}, {}) -> ({}, {})",
                layername,
                segment.width,
                segment.from.x(),
                segment.from.y(),
                segment.to.x(),
                segment.to.y()
            )?;
        }

        return Ok(());
    }

    plan.apply(&mut design)?;

    let output_filename = args.output.unwrap_or_else(|| args.input.clone());
    let file = File::create(&output_filename)
        .with_context(|| format!("cannot create {}", output_filename.display()))?;
    JsonDesign::from_design(&design)?.write(BufWriter::new(file))?;

    Ok(())
}

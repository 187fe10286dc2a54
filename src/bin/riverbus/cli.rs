use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(about, version)]
pub struct Cli {
    #[arg(value_name = "DESIGN FILE",
	  help = "Specify the JSON design file containing the unrouted wires to river-route")]
    pub input: PathBuf,
    #[arg(short, long, value_name = "OUTPUT FILE",
	  help = "Specify the file the routed design is written to. The input file is overwritten by default")
    ]
    pub output: Option<PathBuf>,
    #[arg(short, long = "wire", value_name = "WIRE",
	  help = "Name of an unrouted wire to route, may be repeated. All unrouted wires are routed by default")]
    pub wires: Vec<String>,
    #[arg(long, value_name = "LAYER", help = "Route on this layer instead of the most popular one")]
    pub layer: Option<String>,
    #[arg(long, value_name = "WIDTH", help = "Override the layer's default wire width")]
    pub width: Option<f64>,
    #[arg(long, value_name = "SPACE", help = "Override the layer's minimum spacing")]
    pub space: Option<f64>,
    #[arg(long, value_name = "CLEARANCE", help = "Distance kept between a rail and the first bend off it")]
    pub clearance: Option<f64>,
    #[arg(long, help = "Print the wires that would be created instead of writing the routed design")]
    pub dry_run: bool,
}

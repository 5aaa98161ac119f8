use argh::FromArgs;
use fisc_core::Raster;
use fisc_core::record::background;

#[derive(FromArgs)]
/// Pack background images into a FIS-Control background record.
struct Args {
    /// gauges background image, 800x480
    #[argh(option, short = 'g')]
    gauges: String,

    /// tables background image, 96x96
    #[argh(option, short = 't')]
    tables: Option<String>,

    /// output record path
    #[argh(option, short = 'o')]
    output: String,
}

fn load_raster(path: &str) -> Raster {
    let image = image::open(path).expect("Failed to open input image").to_rgba8();
    let (width, height) = image.dimensions();
    Raster::from_rgba8(width, height, image.into_raw())
        .expect("Decoder produced a malformed raster")
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Args = argh::from_env();

    let gauges = load_raster(&args.gauges);
    let tables = args.tables.as_deref().map(load_raster);

    let record = match background::pack(Some(&gauges), tables.as_ref()) {
        Ok(record) => record,
        Err(err) => {
            log::error!("{err}");
            std::process::exit(1);
        }
    };

    std::fs::write(&args.output, &record[..]).expect("Failed to write background record");
    log::info!("Wrote {} bytes to {}", record.len(), args.output);
}

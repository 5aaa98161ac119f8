use argh::FromArgs;
use fisc_core::Raster;
use fisc_core::record::sprites;

#[derive(FromArgs)]
/// Pack needle and digit glyph images into a FIS-Control sprite record.
struct Args {
    /// needle image, up to three in slot order
    #[argh(option, short = 'n')]
    needle: Vec<String>,

    /// digit glyph image, up to twelve in slot order (0-9, dot, minus)
    #[argh(option, short = 'd')]
    digit: Vec<String>,

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

fn into_slots(paths: &[String], count: usize, what: &str) -> Vec<Option<Raster>> {
    if paths.len() > count {
        log::error!("at most {count} {what} images fit into the record");
        std::process::exit(1);
    }
    let mut slots: Vec<Option<Raster>> = paths.iter().map(|p| Some(load_raster(p))).collect();
    slots.resize(count, None);
    slots
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Args = argh::from_env();

    let needles = into_slots(&args.needle, sprites::NEEDLE_SLOTS, "needle");
    let digits = into_slots(&args.digit, sprites::DIGIT_SLOTS, "digit");

    let record = match sprites::pack(&needles, &digits) {
        Ok(record) => record,
        Err(err) => {
            log::error!("{err}");
            std::process::exit(1);
        }
    };

    std::fs::write(&args.output, &record[..]).expect("Failed to write sprite record");
    log::info!("Wrote {} bytes to {}", record.len(), args.output);
}

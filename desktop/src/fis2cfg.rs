use argh::FromArgs;
use fisc_core::record::settings;

#[derive(FromArgs)]
/// Decode a FIS-Control settings record into a TOML settings file.
struct Args {
    /// input record path
    #[argh(option, short = 'i')]
    input: String,

    /// output TOML settings path
    #[argh(option, short = 'o')]
    output: String,

    /// verify the record checksum before decoding
    #[argh(switch)]
    strict: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Args = argh::from_env();

    let data = std::fs::read(&args.input).expect("Failed to read settings record");
    let result = if args.strict {
        settings::decode_strict(&data)
    } else {
        settings::decode(&data)
    };
    let config = match result {
        Ok(config) => config,
        Err(err) => {
            log::error!("{err}");
            std::process::exit(1);
        }
    };

    let text = toml::to_string_pretty(&config).expect("Failed to serialize settings");
    std::fs::write(&args.output, text).expect("Failed to write settings file");
    log::info!("Wrote {}", args.output);
}

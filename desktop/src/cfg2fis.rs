use argh::FromArgs;
use fisc_core::Config;
use fisc_core::record::settings;

#[derive(FromArgs)]
/// Encode a TOML settings file into a FIS-Control settings record.
struct Args {
    /// input TOML settings path
    #[argh(option, short = 'i')]
    input: String,

    /// output record path
    #[argh(option, short = 'o')]
    output: String,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Args = argh::from_env();

    let text = std::fs::read_to_string(&args.input).expect("Failed to read settings file");
    let config: Config = toml::from_str(&text).expect("Failed to parse settings file");

    let record = match settings::encode(&config) {
        Ok(record) => record,
        Err(err) => {
            log::error!("{err}");
            std::process::exit(1);
        }
    };

    std::fs::write(&args.output, &record[..]).expect("Failed to write settings record");
    log::info!("Wrote {} bytes to {}", record.len(), args.output);
}

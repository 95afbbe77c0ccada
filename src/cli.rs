use clap::{ArgAction, Parser};
use log::info;
use radiooooo::clients::{Mood, errors::Result};
use radiooooo::config::ConfigBuilder;
use radiooooo::display;
use radiooooo::player::{Controls, ExternalPlayer, PlaybackDriver};
use radiooooo::query::{CountryCatalog, Filters, parse_decade};
use radiooooo::radio::{self, Mode, Radio};
use tokio::io::BufReader;

const EXAMPLES: &str = "\
examples:
  radio italy 1970           Italian music from the 70s
  radio japan 80s            Japanese music from the 80s
  radio brazil               Random decade, Brazilian music
  radio 1950                 Random country, 1950s music
  radio --mood slow france   Slow French music
  radio --mood weird 60s     Weird music from the 60s
  radio                      Surprise me!
  radio --list               List all countries
  radio --list 1970          Countries with 70s music";

#[derive(Parser, Debug)]
#[command(name = "radio")]
#[command(
    version,
    about = "Terminal client for radiooooo.com: music from everywhere, everywhen",
    after_help = EXAMPLES
)]
pub struct Cli {
    /// Country name/code and/or decade (e.g. `italy 1970`)
    #[arg(value_name = "FILTER")]
    pub filters: Vec<String>,

    /// Filter by mood (can repeat: -m slow -m weird)
    #[arg(short, long = "mood", value_enum)]
    pub moods: Vec<Mood>,

    /// List countries (optionally only those with tracks in DECADE)
    #[arg(short, long, value_name = "DECADE", num_args = 0..=1, default_missing_value = "all")]
    pub list: Option<String>,

    /// Play one track and exit
    #[arg(short = '1', long)]
    pub one: bool,

    /// Increase verbosity (-v = info, -vv = debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn mode(&self) -> Mode {
        if self.one { Mode::Single } else { Mode::Continuous }
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    info!("Building config ...");
    let config = ConfigBuilder::new().build()?;
    let client = config.client()?;

    if let Some(list) = &cli.list {
        let decade = match list.as_str() {
            "all" => None,
            text => Some(parse_decade(text)?),
        };
        let catalog = CountryCatalog::fetch(&client).await?;
        let countries = radio::list_countries(&client, &catalog, decade).await?;
        let heading = match decade {
            Some(decade) => format!("Countries with tracks in the {decade}s:"),
            None => "All countries:".to_string(),
        };
        print!("{}", display::country_list(&heading, &countries));
        return Ok(());
    }

    let player = ExternalPlayer::discover(config.player.as_deref())?;
    info!("Using {:?}", player.binary());

    let catalog = CountryCatalog::fetch(&client).await?;
    let filters = Filters::parse(&cli.filters, cli.moods.clone(), &catalog)?;

    let mode = cli.mode();
    let controls = match mode {
        Mode::Continuous => Some(Controls::new(BufReader::new(tokio::io::stdin()))),
        Mode::Single => None,
    };

    let mut radio = Radio::new(client, PlaybackDriver::new(player, controls), catalog);
    // also catches Ctrl-C while a request is in flight
    tokio::select! {
        result = radio.run(&filters, mode) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => print!("{}", display::goodbye()),
    }
    Ok(())
}

use clap::{Parser, Subcommand};
use ogc_styles_gen::generate::{self, GenerateOptions, HrefStyle};
use ogc_styles_gen::output::{self, GenerateSummary};
use ogc_styles_gen::writer::{FileWriter, Writer};
use ogc_styles_gen::{config, validate};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ogc-styles-gen")]
#[command(about = "Static document generator for OGC API - Styles")]
#[command(long_about = "\
Static document generator for OGC API - Styles

A style catalog (YAML or TOML) and a directory of assets become a complete,
statically servable document set: the styles collection, one metadata record
per style, every stylesheet encoding, previews and any extra assets.

Output structure:

  dist/
  ├── styles.json                  # Styles collection
  ├── resources/thumbnail.png      # Previews and preloads
  ├── fonts/regular.pbf            # Additional assets, path unchanged
  └── styles/
      ├── night.mapbox.json        # Stylesheets (templated from assets)
      ├── night.sld
      └── night/metadata.json      # Style metadata

Stylesheet assets are templates: {{ base_resource }}, {{ styles_url }},
{{ default_style }}, {{ style_id }} and {{ style_title }} are substituted, and
{{ catalog }} and {{ style }} expose the whole catalog and the current style.

Run 'ogc-styles-gen gen-config' to print a documented example catalog.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate the document set into the output directory
    Generate {
        /// Directory holding stylesheet, preview and additional assets
        asset_dir: PathBuf,
        /// Style catalog (.yaml, .yml or .toml)
        config: PathBuf,
        /// Output directory
        #[arg(long, default_value = "dist")]
        output: PathBuf,
        /// Formats for the collection and metadata documents
        #[arg(long, env = "API_FORMATS", value_delimiter = ',', default_value = "json")]
        formats: Vec<String>,
        /// How stylesheet hrefs name their encoding
        #[arg(long, value_enum, default_value_t = HrefStyle::Extension)]
        href_style: HrefStyle,
    },
    /// Load and validate a catalog without generating anything
    Check {
        /// Style catalog (.yaml, .yml or .toml)
        config: PathBuf,
    },
    /// Print a stock catalog with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env = env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "ogc_styles_gen=info");
    env_logger::Builder::from_env(env).init();

    let cli = Cli::parse();

    match cli.command {
        Command::Generate {
            asset_dir,
            config: config_path,
            output: output_dir,
            formats,
            href_style,
        } => {
            let catalog = config::load_catalog(&config_path)?;
            let options = GenerateOptions::from_format_names(&formats, href_style);
            let mut writer = FileWriter::new(&output_dir);
            let mut summary = GenerateSummary::default();

            for item in generate::stream_documents(catalog, asset_dir, options) {
                let document = item?;
                writer.write_document(&document)?;
                output::print_document_line(&document);
                summary.record(&document);
            }
            output::print_generate_summary(&summary, writer.root());
        }
        Command::Check {
            config: config_path,
        } => {
            let catalog = config::load_catalog(&config_path)?;
            validate::validate(&catalog)?;
            output::print_check_output(&catalog);
        }
        Command::GenConfig => {
            print!("{}", config::stock_catalog_yaml());
        }
    }

    Ok(())
}

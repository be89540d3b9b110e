mod cgi;
mod render;
mod request;

use std::env;
use std::io::{self, Write};
use std::process;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use eu_tire_label_core::{Field, Regulation};
use eu_tire_label_diagnostics as diag;

use crate::render::{Format, render_error_json, report};
use crate::request::{LabelRequest, Rendered};

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "eu-tire-label",
    version,
    about = "Render EU tire labels (EC 1222/2009 and EU 2020/740) as SVG or PNG",
    long_about = "Render EU tire labels (EC 1222/2009 and EU 2020/740) as SVG or PNG.\n\n\
                  When REQUEST_METHOD is set the program runs as a CGI script and reads \
                  the label fields from QUERY_STRING (e.g. C=1&F=B&G=A&R=2&N=70).",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    /// Diagnostics format on stderr: "pretty" for coloured terminal output,
    /// "json" for machine-readable JSON. Defaults to "pretty" when stderr is
    /// a TTY, "json" otherwise.
    #[arg(long, global = true, value_parser = ["pretty", "json"])]
    diagnostics: Option<String>,

    #[command(flatten)]
    label: LabelArgs,

    #[command(subcommand)]
    cmd: Option<Cmd>,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Explain a diagnostic ID (e.g. TL1002).
    Explain { id: String },
}

/// Label fields and output selection.
#[derive(Args, Debug)]
struct LabelArgs {
    /// Tire class; one of 1, 2 or 3.
    #[arg(short = 'C', long, value_name = "CLASS")]
    tire_class: Option<String>,

    /// Fuel efficiency class: 1-7 or A-G.
    #[arg(short = 'F', long, value_name = "CLASS")]
    fuel_efficiency: Option<String>,

    /// Wet grip class: 1-7 or A-G.
    #[arg(short = 'G', long, value_name = "CLASS")]
    wet_grip: Option<String>,

    /// External rolling noise class: 1-3 or A-C.
    #[arg(short = 'R', long, value_name = "CLASS")]
    rolling_noise: Option<String>,

    /// External rolling noise value in dB (10-120).
    #[arg(short = 'N', long, value_name = "DB")]
    rolling_noise_db: Option<String>,

    /// Snow grip pictogram (EU 2020/740 only).
    #[arg(
        short = 'S',
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        default_missing_value = "yes"
    )]
    snow_grip: Option<String>,

    /// Ice grip pictogram (EU 2020/740 only).
    #[arg(
        short = 'I',
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        default_missing_value = "yes"
    )]
    ice_grip: Option<String>,

    /// Supplier's trademark (EU 2020/740 only).
    #[arg(short = 'M', long, value_name = "TEXT")]
    trademark: Option<String>,

    /// Tire type identifier (EU 2020/740 only).
    #[arg(short = 'T', long, value_name = "TEXT")]
    tire_type: Option<String>,

    /// Tire size designation (EU 2020/740 only).
    #[arg(short = 'D', long, value_name = "TEXT")]
    tire_size: Option<String>,

    /// Text encoded in the QR code, usually the EPREL product URL
    /// (EU 2020/740 only).
    #[arg(short = 'Q', long, value_name = "URL")]
    qrcode: Option<String>,

    /// Label regulation: ec-1222-2009 (ec) or eu-2020-740 (eu).
    #[arg(short = 'L', long, value_name = "REGULATION", default_value_t = Regulation::default())]
    regulation: Regulation,

    /// Return the label in the SVG format (default).
    #[arg(long)]
    output_svg: bool,

    /// Return the label in the PNG format; a missing side keeps the label's
    /// aspect ratio.
    #[cfg(feature = "png")]
    #[arg(
        long,
        value_name = "WIDTH[xHEIGHT]",
        num_args = 0..=1,
        default_missing_value = "",
        conflicts_with = "output_svg"
    )]
    output_png: Option<String>,
}

impl LabelArgs {
    /// Raw field values, in `Field::ALL` order.
    fn fields(&self) -> [(Field, Option<&str>); 11] {
        [
            (Field::TireClass, self.tire_class.as_deref()),
            (Field::FuelEfficiency, self.fuel_efficiency.as_deref()),
            (Field::WetGrip, self.wet_grip.as_deref()),
            (Field::RollingNoise, self.rolling_noise.as_deref()),
            (Field::RollingNoiseDb, self.rolling_noise_db.as_deref()),
            (Field::SnowGrip, self.snow_grip.as_deref()),
            (Field::IceGrip, self.ice_grip.as_deref()),
            (Field::Trademark, self.trademark.as_deref()),
            (Field::TireType, self.tire_type.as_deref()),
            (Field::TireSize, self.tire_size.as_deref()),
            (Field::QrcodeTarget, self.qrcode.as_deref()),
        ]
    }

    fn to_request(&self) -> LabelRequest {
        let mut request = LabelRequest::new(self.regulation);
        for (field, raw) in self.fields() {
            if let Some(raw) = raw {
                request.set(field, raw, None);
            }
        }
        #[cfg(feature = "png")]
        {
            if let Some(size) = &self.output_png {
                request.request_png(size, None);
            }
        }
        request
    }
}

// ── Main ────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    let format = Format::resolve_or_detect(cli.diagnostics.as_deref());

    let result = match cli.cmd {
        Some(Cmd::Explain { id }) => cmd_explain(&id, format),
        None => cmd_render(&cli.label, format),
    };

    if let Err(e) = result {
        if format == Format::Json {
            render_error_json(&format!("{e:#}"));
            process::exit(1);
        }
        return Err(e);
    }
    Ok(())
}

// ── Commands ────────────────────────────────────────────────────────────

fn cmd_render(args: &LabelArgs, format: Format) -> Result<()> {
    let mut request = args.to_request();

    if let Ok(method) = env::var(cgi::REQUEST_METHOD) {
        let query = env::var(cgi::QUERY_STRING).unwrap_or_default();
        let mut out = io::stdout().lock();
        let status = cgi::respond(&method, &query, request, format, &mut out)?;
        out.flush().context("failed to write CGI response")?;
        if status != cgi::Status::Ok {
            process::exit(1);
        }
        return Ok(());
    }

    let result = request.render();
    let failure = result.as_ref().err().filter(|e| !e.is_missing_tire_class());
    report(None, &request, failure, format);
    match result {
        Ok(rendered) => write_label(&rendered),
        // Already reported, including any failure.
        Err(_) => process::exit(1),
    }
}

fn cmd_explain(id: &str, format: Format) -> Result<()> {
    match format {
        Format::Json => {
            let out = serde_json::json!({
                "id": id,
                "explanation": diag::explain(id),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            // Explanation is the expected output, so it goes to stdout.
            if let Some(text) = diag::explain(id) {
                use ariadne::Fmt;
                println!("{}: {}", id.fg(ariadne::Color::Cyan), text);
            } else {
                println!("{id}: (no explanation available)");
            }
        }
    }
    Ok(())
}

// ── Helpers ─────────────────────────────────────────────────────────────

/// Write the label to stdout; SVG gets a trailing newline, PNG is raw.
fn write_label(rendered: &Rendered) -> Result<()> {
    let mut out = io::stdout().lock();
    out.write_all(&rendered.body)
        .and_then(|()| {
            if rendered.is_svg() {
                out.write_all(b"\n")
            } else {
                Ok(())
            }
        })
        .and_then(|()| out.flush())
        .context("failed to write label to stdout")
}

use anyhow::{anyhow, bail, Context, Result};
use epervier_cli::api_client::SearchRequest;
use epervier_cli::color::color_or_default;
use epervier_cli::config::config::Config;
use epervier_cli::result_renderer::RenderOptions;

/// Parsed `go` command: the request to send plus the render options that
/// accompany it.
#[derive(Debug)]
pub struct GoCommand {
    pub request: SearchRequest,
    pub options: RenderOptions,
}

/// Splits `key=value` pairs, honoring double quotes around values so
/// addresses with spaces survive: `address="12 rue de la Paix, Auch"`.
fn parse_key_values(input: &str) -> Result<Vec<(String, String)>> {
    let mut pairs = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let mut key = String::new();
        while let Some(&c) = chars.peek() {
            if c == '=' || c.is_whitespace() {
                break;
            }
            key.push(c);
            chars.next();
        }
        if key.is_empty() {
            bail!("missing field name before '='");
        }
        if chars.next() != Some('=') {
            bail!("expected {key}=<value>");
        }

        let mut value = String::new();
        if chars.peek() == Some(&'"') {
            chars.next();
            let mut closed = false;
            for c in chars.by_ref() {
                if c == '"' {
                    closed = true;
                    break;
                }
                value.push(c);
            }
            if !closed {
                bail!("unterminated quote in {key}=...");
            }
        } else {
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() {
                    break;
                }
                value.push(c);
                chars.next();
            }
        }

        pairs.push((key, value));
    }

    Ok(pairs)
}

/// Leak time as plain minutes (`90`) or clock form (`1:30`).
fn parse_leak_time(value: &str) -> Result<u32> {
    if let Some((hours, minutes)) = value.split_once(':') {
        let hours: u32 = hours.parse().context("bad hour count in time")?;
        let minutes: u32 = minutes.parse().context("bad minute count in time")?;
        if minutes >= 60 {
            bail!("minutes must be below 60 in H:MM, got {minutes}");
        }
        Ok(hours * 60 + minutes)
    } else {
        value.parse().context("time must be minutes or H:MM")
    }
}

pub fn parse_go_args(args: &str, config: &Config) -> Result<GoCommand> {
    let mut address = None;
    let mut leak_time_minutes = None;
    let mut strategy = None;
    let mut leak_direction = String::new();
    let mut point_count = 10u32;
    let mut time_step = None;
    let mut zone_color = None;
    let mut point_color = None;
    let mut show_zones = config.render.show_valid_zone;

    for (key, value) in parse_key_values(args)? {
        match key.as_str() {
            "address" => address = Some(value),
            "time" => leak_time_minutes = Some(parse_leak_time(&value)?),
            "strat" => strategy = Some(value),
            "dir" => leak_direction = value,
            "n" => point_count = value.parse().context("n must be a whole number")?,
            "dt" => time_step = Some(value.parse().context("dt must be a number of seconds")?),
            "color" => zone_color = Some(value),
            "dot" => point_color = Some(value),
            "zone" => {
                show_zones = match value.as_str() {
                    "on" => true,
                    "off" => false,
                    other => bail!("zone must be on or off, not {other:?}"),
                }
            }
            other => bail!("unknown field {other:?}, see help"),
        }
    }

    let address = address.ok_or_else(|| anyhow!("address=... is required"))?;
    if address.is_empty() {
        bail!("address must not be empty");
    }
    let leak_time_minutes = leak_time_minutes.ok_or_else(|| anyhow!("time=... is required"))?;
    let strategy = strategy.ok_or_else(|| anyhow!("strat=... is required"))?;

    let zone_color = color_or_default(zone_color.as_deref(), &config.render.zone_color);
    let point_color = color_or_default(point_color.as_deref(), &config.render.point_color);

    Ok(GoCommand {
        request: SearchRequest {
            address,
            leak_time_minutes,
            leak_direction,
            strategy,
            point_count,
            time_step,
            iso_color: Some(zone_color.clone()),
            show_isochrone: show_zones,
        },
        options: RenderOptions {
            point_color,
            zone_color,
            show_valid_zone: show_zones,
        },
    })
}

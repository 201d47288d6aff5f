use anyhow::Result;
use owo_colors::{OwoColorize, Stream};
use serde::Serialize;

use udfpack_lib::GatewayType;

use crate::output::{OutputFormat, print_json, symbols};

#[derive(Serialize)]
struct GatewayInfo {
  gateway: GatewayType,
  supports_udf: bool,
  session_mode: bool,
}

pub fn cmd_gateways(format: OutputFormat) -> Result<()> {
  let gateways: Vec<GatewayInfo> = GatewayType::ALL
    .into_iter()
    .map(|gateway| {
      let caps = gateway.capabilities();
      GatewayInfo {
        gateway,
        supports_udf: caps.supports_udf,
        session_mode: caps.session_mode,
      }
    })
    .collect();

  if format.is_json() {
    return print_json(&gateways);
  }

  for info in &gateways {
    let mark = if info.supports_udf {
      symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()).to_string()
    } else {
      symbols::ERROR.if_supports_color(Stream::Stdout, |s| s.red()).to_string()
    };
    let mode = if info.session_mode { "session" } else { "per-job" };
    println!("{} {:<24} {}", mark, info.gateway, mode);
  }
  Ok(())
}

//! `hpasim defaults` — print the reference configuration.

use hpasim_core::SimulatorConfig;

use super::DefaultsFormat;

pub fn defaults(format: DefaultsFormat) -> anyhow::Result<()> {
    print!("{}", render(format)?);
    Ok(())
}

pub fn render(format: DefaultsFormat) -> anyhow::Result<String> {
    let config = SimulatorConfig::default();
    let mut body = match format {
        DefaultsFormat::Toml => config.to_toml_string()?,
        DefaultsFormat::Json => config.to_json_string()?,
    };
    if !body.ends_with('\n') {
        body.push('\n');
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_scaffold_parses_back() {
        let body = render(DefaultsFormat::Toml).unwrap();
        let parsed = SimulatorConfig::from_toml_str(&body).unwrap();
        assert_eq!(parsed, SimulatorConfig::default());
    }

    #[test]
    fn json_scaffold_parses_back() {
        let body = render(DefaultsFormat::Json).unwrap();
        let parsed = SimulatorConfig::from_json_str(&body).unwrap();
        assert_eq!(parsed, SimulatorConfig::default());
    }
}

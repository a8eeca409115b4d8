use crate::console::ConsoleSurface;
use crate::driver::{Driver, FormValues, Outcome};
use crate::guide::TravelGuide;
use crate::{config, provider};
use provider::Provider;
use std::io::Write;
use std::sync::Arc;

pub const DEFAULT_MODEL: &str = "gemini-1.5-pro";
pub const DEFAULT_PROVIDER: &str = "google";

const KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "GOOGLE_API_KEY"];

/// Credential for the Google provider: environment first, then config.
pub fn resolve_api_key(cfg: Option<&config::Config>) -> Option<String> {
    resolve_api_key_with(|name| std::env::var(name).ok(), cfg)
}

fn resolve_api_key_with(
    lookup: impl Fn(&str) -> Option<String>,
    cfg: Option<&config::Config>,
) -> Option<String> {
    KEY_VARS
        .iter()
        .find_map(|name| lookup(name).filter(|v| !v.trim().is_empty()))
        .or_else(|| cfg.and_then(|c| c.google.api_key.clone()))
}

pub fn resolve_model(flag: Option<String>, cfg: Option<&config::Config>) -> String {
    flag.or_else(|| cfg.and_then(|c| c.model.clone()))
        .unwrap_or_else(|| DEFAULT_MODEL.to_string())
}

pub fn resolve_provider_name(flag: Option<String>, cfg: Option<&config::Config>) -> String {
    flag.or_else(|| cfg.and_then(|c| c.provider.clone()))
        .unwrap_or_else(|| DEFAULT_PROVIDER.to_string())
}

pub fn build_provider(
    http: &reqwest::Client,
    cfg: Option<&config::Config>,
    provider_name: &str,
    api_key: Option<String>,
) -> anyhow::Result<Arc<dyn Provider + Send + Sync>> {
    match provider_name {
        "google" => {
            #[cfg(feature = "google")]
            {
                if api_key.is_none() {
                    // Not fatal: every request will report the missing key instead.
                    tracing::warn!("no Gemini API key found; set GEMINI_API_KEY or google.api_key in config.toml");
                }

                let p = match cfg.and_then(|c| c.google.api_base.as_deref()) {
                    Some(base) => provider::google::GoogleProvider::with_api_base(http.clone(), api_key, base)?,
                    None => provider::google::GoogleProvider::new(http.clone(), api_key)?,
                };
                Ok(Arc::new(p))
            }
            #[cfg(not(feature = "google"))]
            {
                let _ = (http, cfg, api_key);
                anyhow::bail!("google provider is not enabled in this build")
            }
        }
        "stub" => Ok(Arc::new(provider::stub::StubProvider::new())),
        other => anyhow::bail!("unknown provider: {other} (expected \"google\" or \"stub\")"),
    }
}

/// One-shot run of the form on the command line.
pub async fn cmd_plan(guide: TravelGuide, form: FormValues) -> anyhow::Result<()> {
    let outcome = plan_into(std::io::stdout(), guide, &form).await;
    tracing::debug!(?outcome, "run finished");
    Ok(())
}

async fn plan_into<W>(out: W, guide: TravelGuide, form: &FormValues) -> Outcome
where
    W: Write + Send,
{
    let mut surface = ConsoleSurface::new(out);
    surface.banner();

    let outcome = Driver::new(guide).trigger(form, &mut surface).await;

    surface.footer();
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::{BANNER, FOOTER};
    use crate::driver::TRAVEL_HEADING;
    use crate::guide::testing::ScriptedProvider;
    use config::{Config, GoogleConfig};
    use std::collections::HashMap;

    fn cfg_with_key(key: &str) -> Config {
        Config {
            google: GoogleConfig {
                api_key: Some(key.to_string()),
                api_base: None,
            },
            ..Config::default()
        }
    }

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn gemini_key_beats_google_key_and_config() {
        let cfg = cfg_with_key("from-config");
        let key = resolve_api_key_with(env(&[("GEMINI_API_KEY", "g1"), ("GOOGLE_API_KEY", "g2")]), Some(&cfg));
        assert_eq!(key.as_deref(), Some("g1"));
    }

    #[test]
    fn falls_back_through_google_key_to_config() {
        let cfg = cfg_with_key("from-config");
        let key = resolve_api_key_with(env(&[("GEMINI_API_KEY", " "), ("GOOGLE_API_KEY", "g2")]), Some(&cfg));
        assert_eq!(key.as_deref(), Some("g2"));

        let key = resolve_api_key_with(env(&[]), Some(&cfg));
        assert_eq!(key.as_deref(), Some("from-config"));

        assert_eq!(resolve_api_key_with(env(&[]), None), None);
    }

    #[test]
    fn flag_then_config_then_default() {
        let cfg = Config {
            model: Some("gemini-1.5-flash".to_string()),
            provider: Some("stub".to_string()),
            ..Config::default()
        };
        assert_eq!(resolve_model(Some("gemini-2.0".to_string()), Some(&cfg)), "gemini-2.0");
        assert_eq!(resolve_model(None, Some(&cfg)), "gemini-1.5-flash");
        assert_eq!(resolve_model(None, None), DEFAULT_MODEL);
        assert_eq!(resolve_provider_name(None, Some(&cfg)), "stub");
        assert_eq!(resolve_provider_name(None, None), DEFAULT_PROVIDER);
    }

    fn plan_form(source: &str, destination: &str) -> FormValues {
        FormValues {
            source: source.to_string(),
            destination: destination.to_string(),
            date: chrono::NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        }
    }

    #[tokio::test]
    async fn blank_source_prints_only_banner_and_footer() {
        let provider = ScriptedProvider::default();
        let guide = TravelGuide::new(Arc::new(provider.clone()), DEFAULT_MODEL);

        let mut buf = Vec::new();
        let outcome = plan_into(&mut buf, guide, &plan_form("", "Paris")).await;

        assert_eq!(outcome, Outcome::Rejected);
        assert!(provider.calls().is_empty());
        let out = String::from_utf8(buf).unwrap();
        assert_eq!(out, format!("{BANNER}\n\n{FOOTER}\n"));
    }

    #[tokio::test]
    async fn stub_run_prints_both_sections() {
        let http = reqwest::Client::new();
        let guide = TravelGuide::new(build_provider(&http, None, "stub", None).unwrap(), DEFAULT_MODEL);

        let mut buf = Vec::new();
        let outcome = plan_into(&mut buf, guide, &plan_form("Hyderabad", "Durgi")).await;

        assert_eq!(outcome, Outcome::Displayed);
        let out = String::from_utf8(buf).unwrap();
        let travel = out.find(TRAVEL_HEADING).unwrap();
        let facts = out.find("🌟 What is Famous in Durgi?").unwrap();
        assert!(travel < facts);
        assert!(out.contains("You asked: What is famous in Durgi?"));
        assert!(out.ends_with(&format!("{FOOTER}\n")));
    }

    #[tokio::test]
    async fn cmd_plan_succeeds_on_blank_form() {
        let guide = TravelGuide::new(Arc::new(ScriptedProvider::default()), DEFAULT_MODEL);
        assert!(cmd_plan(guide, plan_form("", "Paris")).await.is_ok());
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let http = reqwest::Client::new();
        let err = build_provider(&http, None, "openai", None).err().unwrap();
        assert!(err.to_string().contains("unknown provider: openai"));
    }

    #[cfg(feature = "google")]
    #[test]
    fn google_provider_builds_without_a_key() {
        let http = reqwest::Client::new();
        let p = build_provider(&http, None, "google", None).unwrap();
        assert_eq!(p.name(), "google");
    }
}

use crate::auth::guess_auth_method;
use crate::filters;
use apilens_protocol::{Exchange, RecordedExchange, TraceBundle};
use std::collections::{BTreeMap, BTreeSet};
use url::Url;

/// Trace ingestor: raw recorded exchanges in, canonical [`TraceBundle`] out.
///
/// Stateless and infallible by contract — malformed entries are skipped with
/// a debug log, never surfaced as errors.
///
/// [`TraceBundle`]: apilens_protocol::TraceBundle
#[derive(Debug, Default)]
pub struct TraceIngestor;

fn header_get(headers: &BTreeMap<String, String>, name: &str) -> Option<String> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.clone())
}

fn looks_like_api_domain(domain: &str) -> bool {
    domain.contains("api.")
        || domain.contains("service")
        || domain.starts_with("dev-")
        || domain.starts_with("staging-")
}

/// Pick the service name and primary base URL from observed domains.
///
/// Prefers the busiest api-ish domain; a seed URL ties the service name to
/// the domain the user actually asked about.
fn elect_service(
    domain_counts: &BTreeMap<String, usize>,
    seed_domain: Option<&str>,
    seed_base: Option<&str>,
) -> (String, String) {
    let busiest_api = domain_counts
        .iter()
        .filter(|(d, _)| looks_like_api_domain(d))
        .max_by_key(|(_, count)| *count)
        .map(|(d, _)| d.as_str());

    if let Some(best) = busiest_api {
        if let Some(sd) = seed_domain {
            if filters::same_root_domain(best, sd) {
                return (filters::derive_service_name(sd), format!("https://{best}"));
            }
            if let Some(sb) = seed_base {
                return (filters::derive_service_name(sd), sb.to_string());
            }
        }
        return (filters::derive_service_name(best), format!("https://{best}"));
    }

    if let Some(sd) = seed_domain {
        let base = seed_base
            .map(String::from)
            .unwrap_or_else(|| format!("https://{sd}"));
        return (filters::derive_service_name(sd), base);
    }

    if let Some((main, _)) = domain_counts.iter().max_by_key(|(_, count)| *count) {
        return (filters::derive_service_name(main), format!("https://{main}"));
    }

    ("unknown-api".to_string(), "https://api.example.com".to_string())
}

impl TraceIngestor {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Normalize a raw recorded-exchange list into a canonical trace bundle.
    ///
    /// Filters static assets, third-party domains and HTML navigations;
    /// collects auth evidence into a summary; elects service name and base
    /// URL; orders by capture time when every exchange has a timestamp
    /// (input order otherwise).
    #[must_use]
    pub fn ingest(&self, raw: &[RecordedExchange], seed_url: Option<&str>) -> TraceBundle {
        let seed = seed_url.and_then(|u| Url::parse(u).ok());
        let seed_domain = seed
            .as_ref()
            .and_then(|u| u.host_str().map(String::from));
        let seed_base = seed
            .as_ref()
            .and_then(|u| u.host_str().map(|h| format!("{}://{h}", u.scheme())));

        let mut exchanges: Vec<Exchange> = Vec::new();
        let mut auth_headers: BTreeMap<String, String> = BTreeMap::new();
        let mut cookies: BTreeMap<String, String> = BTreeMap::new();
        let mut target_domains: BTreeSet<String> = BTreeSet::new();
        let mut base_urls: BTreeSet<String> = BTreeSet::new();
        let mut domain_counts: BTreeMap<String, usize> = BTreeMap::new();

        for rec in raw {
            let parsed = match Url::parse(&rec.url) {
                Ok(u) => u,
                Err(err) => {
                    log::debug!("skipping unparseable URL {:?}: {err}", rec.url);
                    continue;
                }
            };
            let path = parsed.path().to_string();
            if filters::is_static_asset(&path) {
                continue;
            }
            let Some(domain) = parsed.host_str().map(String::from) else {
                continue;
            };
            if filters::is_third_party_domain(&domain) {
                log::debug!("skipping third-party domain {domain}");
                continue;
            }

            let response_ct = rec
                .response_content_type
                .clone()
                .or_else(|| header_get(&rec.response_headers, "content-type"));

            // HTML page navigations are browsing, not API surface.
            if rec.method == "GET" {
                if let Some(ct) = &response_ct {
                    if filters::is_html_content_type(ct) {
                        continue;
                    }
                }
            }

            let seed_related = seed_domain
                .as_deref()
                .map(|sd| filters::same_root_domain(&domain, sd))
                .unwrap_or(false);
            let is_target = target_domains.contains(&domain) || seed_related;
            if !filters::is_api_like(&path, &rec.method, &domain, response_ct.as_deref())
                && !target_domains.is_empty()
                && !is_target
            {
                log::debug!("skipping non-API exchange {} {}", rec.method, rec.url);
                continue;
            }

            target_domains.insert(domain.clone());
            base_urls.insert(format!("{}://{domain}", parsed.scheme()));
            *domain_counts.entry(domain.clone()).or_default() += 1;

            for (name, value) in &rec.request_headers {
                let lower = name.to_lowercase();
                if filters::is_http2_pseudo_header(&lower) || value.is_empty() {
                    continue;
                }
                if filters::is_auth_like_header(&lower) {
                    auth_headers.insert(lower, value.clone());
                }
            }
            for (name, value) in &rec.request_cookies {
                cookies.insert(name.clone(), value.clone());
            }

            let request_ct = rec
                .request_content_type
                .clone()
                .or_else(|| header_get(&rec.request_headers, "content-type"));
            let query = parsed
                .query_pairs()
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect();

            exchanges.push(Exchange {
                method: rec.method.clone(),
                url: rec.url.clone(),
                domain,
                path,
                query,
                request_body: rec.request_body.clone(),
                request_content_type: request_ct,
                status: rec.status,
                response_body: rec.response_body.clone(),
                response_content_type: response_ct,
                captured_at: rec.captured_at,
            });
        }

        if !exchanges.is_empty() && exchanges.iter().all(|e| e.captured_at.is_some()) {
            exchanges.sort_by_key(|e| e.captured_at);
        }

        let (service, base_url) =
            elect_service(&domain_counts, seed_domain.as_deref(), seed_base.as_deref());

        log::info!(
            "Ingested {} of {} exchanges across {} domain(s) for service {service}",
            exchanges.len(),
            raw.len(),
            target_domains.len()
        );

        TraceBundle {
            service,
            base_url,
            base_urls: base_urls.into_iter().collect(),
            auth_method: guess_auth_method(&auth_headers, &cookies),
            exchanges,
        }
    }
}

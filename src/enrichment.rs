//! Best-effort domain enrichment: WHOIS registration metadata and DNS
//! resolution for the host of a classified URL.
//!
//! Enrichment never influences a verdict and never fails a request: every
//! lookup problem is recovered locally by substituting the `"Unknown"`
//! sentinel, with the failure logged for diagnosis.

use std::io;
use std::time::Duration;

use serde::Serialize;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{lookup_host, TcpStream};
use tokio::time::timeout;
use url::Url;

/// Sentinel value for enrichment fields that could not be resolved.
pub const UNKNOWN: &str = "Unknown";

const IANA_WHOIS_SERVER: &str = "whois.iana.org";
const WHOIS_PORT: u16 = 43;
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(8);

/// Registration and network metadata for a domain. Fields that could not be
/// resolved carry the [`UNKNOWN`] sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainInfo {
    pub registration_date: String,
    pub registrar: String,
    pub whois_server: String,
    pub status: String,
    pub ip_address: String,
    pub country: String,
    pub region: String,
    pub city: String,
}

impl DomainInfo {
    /// The all-sentinel record substituted when a lookup fails outright.
    pub fn unknown() -> Self {
        Self {
            registration_date: UNKNOWN.to_string(),
            registrar: UNKNOWN.to_string(),
            whois_server: UNKNOWN.to_string(),
            status: UNKNOWN.to_string(),
            ip_address: UNKNOWN.to_string(),
            country: UNKNOWN.to_string(),
            region: UNKNOWN.to_string(),
            city: UNKNOWN.to_string(),
        }
    }
}

impl Default for DomainInfo {
    fn default() -> Self {
        Self::unknown()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EnrichmentError {
    #[error("no resolvable host in input")]
    NoHost,
    #[error("WHOIS lookup timed out")]
    Timeout,
    #[error("WHOIS connection failed: {0}")]
    Connect(io::Error),
    #[error("WHOIS response unreadable: {0}")]
    Protocol(io::Error),
    #[error("WHOIS data insufficient")]
    Insufficient,
}

/// Looks up registration and network metadata for the domain of a raw URL.
///
/// Infallible by design: any failure along the way degrades to
/// [`DomainInfo::unknown`] after logging the reason, so callers can attach
/// the result unconditionally.
pub async fn lookup(url: &str) -> DomainInfo {
    match try_lookup(url).await {
        Ok(info) => info,
        Err(err) => {
            log::warn!("domain enrichment failed for {:?}: {}", url, err);
            DomainInfo::unknown()
        }
    }
}

async fn try_lookup(url: &str) -> Result<DomainInfo, EnrichmentError> {
    let domain = registrable_host(url).ok_or(EnrichmentError::NoHost)?;
    log::info!("Attempting WHOIS lookup for domain: {}", domain);
    let info = lookup_domain(&domain).await?;
    log::info!("Successfully retrieved domain info for: {}", domain);
    Ok(info)
}

/// Extracts the registrable host from a raw URL, assuming `http://` when the
/// scheme is missing and dropping a leading `www.`.
fn registrable_host(url: &str) -> Option<String> {
    let candidate = if url.contains("://") {
        url.to_string()
    } else {
        format!("http://{url}")
    };
    let parsed = Url::parse(&candidate).ok()?;
    let mut host = parsed.host_str()?;
    while let Some(rest) = host.strip_prefix("www.") {
        host = rest;
    }
    if host.is_empty() {
        None
    } else {
        Some(host.to_string())
    }
}

async fn lookup_domain(domain: &str) -> Result<DomainInfo, EnrichmentError> {
    let response = whois_query(domain).await?;
    let mut info = parse_whois(&response);

    // Mirror of the registration-data bar for a useful record: without any
    // of these three the registry told us nothing worth attaching.
    if info.registration_date == UNKNOWN
        && info.registrar == UNKNOWN
        && info.whois_server == UNKNOWN
    {
        return Err(EnrichmentError::Insufficient);
    }

    info.ip_address = match resolve_ip(domain).await {
        Some(ip) => ip,
        None => {
            log::warn!("IP lookup failed for {}", domain);
            UNKNOWN.to_string()
        }
    };

    Ok(info)
}

/// RFC 3912 query: ask the IANA root for the TLD's registry server, then ask
/// that server about the domain. Falls back to the IANA response itself when
/// no referral is present.
async fn whois_query(domain: &str) -> Result<String, EnrichmentError> {
    let root_response = whois_request(IANA_WHOIS_SERVER, domain).await?;

    let referral = root_response
        .lines()
        .find_map(|line| line.strip_prefix("refer:"))
        .map(str::trim)
        .filter(|server| !server.is_empty());

    match referral {
        Some(server) => whois_request(server, domain).await,
        None => Ok(root_response),
    }
}

async fn whois_request(server: &str, query: &str) -> Result<String, EnrichmentError> {
    let exchange = async {
        let mut stream = TcpStream::connect((server, WHOIS_PORT))
            .await
            .map_err(EnrichmentError::Connect)?;
        stream
            .write_all(format!("{query}\r\n").as_bytes())
            .await
            .map_err(EnrichmentError::Protocol)?;
        let mut response = Vec::new();
        stream
            .read_to_end(&mut response)
            .await
            .map_err(EnrichmentError::Protocol)?;
        Ok(String::from_utf8_lossy(&response).into_owned())
    };

    timeout(LOOKUP_TIMEOUT, exchange)
        .await
        .map_err(|_| EnrichmentError::Timeout)?
}

/// Pulls the fields we report out of a key:value WHOIS response. Only the
/// first occurrence of each key wins; registries repeat status lines.
fn parse_whois(response: &str) -> DomainInfo {
    let mut info = DomainInfo::unknown();

    for line in response.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim().to_lowercase();
        let value = value.trim();
        if value.is_empty() {
            continue;
        }

        match key.as_str() {
            "creation date" | "created" | "registered on" | "registration time" => {
                if info.registration_date == UNKNOWN {
                    // "1997-09-15T04:00:00Z" -> "1997-09-15"
                    let date = value.split('T').next().unwrap_or(value);
                    info.registration_date = date.to_string();
                }
            }
            "registrar" => {
                if info.registrar == UNKNOWN {
                    info.registrar = value.to_string();
                }
            }
            "registrar whois server" | "whois server" | "whois" => {
                if info.whois_server == UNKNOWN {
                    info.whois_server = value.to_string();
                }
            }
            "domain status" | "status" => {
                if info.status == UNKNOWN {
                    // Strip the ICANN reference URL suffix if present.
                    let status = value.split_whitespace().next().unwrap_or(value);
                    info.status = status.to_string();
                }
            }
            "registrant country" | "country" => {
                if info.country == UNKNOWN {
                    info.country = value.to_string();
                }
            }
            "registrant state/province" | "state" => {
                if info.region == UNKNOWN {
                    info.region = value.to_string();
                }
            }
            "registrant city" | "city" => {
                if info.city == UNKNOWN {
                    info.city = value.to_string();
                }
            }
            _ => {}
        }
    }

    info
}

async fn resolve_ip(domain: &str) -> Option<String> {
    let lookup = timeout(LOOKUP_TIMEOUT, lookup_host((domain, 0))).await;
    match lookup {
        Ok(Ok(mut addrs)) => addrs.next().map(|addr| addr.ip().to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registrable_host() {
        assert_eq!(
            registrable_host("https://www.example.com/a"),
            Some("example.com".to_string())
        );
        assert_eq!(
            registrable_host("example.com/a"),
            Some("example.com".to_string())
        );
        assert_eq!(registrable_host("not a url %%%"), None);
        assert_eq!(registrable_host(""), None);
    }

    #[test]
    fn test_parse_whois_extracts_first_occurrences() {
        let response = "\
Domain Name: EXAMPLE.COM\n\
Registrar WHOIS Server: whois.iana.org\n\
Registrar: RESERVED-Internet Assigned Numbers Authority\n\
Creation Date: 1995-08-14T04:00:00Z\n\
Domain Status: clientDeleteProhibited https://icann.org/epp#clientDeleteProhibited\n\
Domain Status: clientTransferProhibited https://icann.org/epp#clientTransferProhibited\n\
Registrant Country: US\n\
Registrant State/Province: CA\n\
Registrant City: Los Angeles\n";

        let info = parse_whois(response);
        assert_eq!(info.registration_date, "1995-08-14");
        assert_eq!(info.registrar, "RESERVED-Internet Assigned Numbers Authority");
        assert_eq!(info.whois_server, "whois.iana.org");
        assert_eq!(info.status, "clientDeleteProhibited");
        assert_eq!(info.country, "US");
        assert_eq!(info.region, "CA");
        assert_eq!(info.city, "Los Angeles");
        assert_eq!(info.ip_address, UNKNOWN);
    }

    #[test]
    fn test_parse_whois_empty_response_is_all_unknown() {
        assert_eq!(parse_whois(""), DomainInfo::unknown());
    }

    #[tokio::test]
    async fn test_lookup_without_host_yields_sentinel_record() {
        let info = lookup("").await;
        assert_eq!(info, DomainInfo::unknown());

        let info = lookup("not a url %%%").await;
        assert_eq!(info, DomainInfo::unknown());
    }
}

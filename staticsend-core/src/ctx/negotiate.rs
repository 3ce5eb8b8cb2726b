//! Accept-Encoding negotiation.

#[derive(Debug, Clone, PartialEq)]
struct AcceptedCoding<'h> {
    coding: &'h str,
    q: f32,
    /// Position in the header.
    order: usize,
}

#[derive(Debug, Clone, Copy)]
struct Priority {
    q: f32,
    /// 1 for an exact match, 0 for `*`.
    specificity: u8,
    order: usize,
}

/// Parse quality value from an Accept-Encoding part (e.g., "gzip;q=0.5" -> 0.5)
fn parse_quality(part: &str) -> f32 {
    part.split(';')
        .skip(1)
        .find_map(|param| param.trim().strip_prefix("q="))
        .and_then(|s| s.trim().parse::<f32>().ok())
        .map(|q| q.clamp(0.0, 1.0))
        .unwrap_or(1.0)
}

/// Parses the header. `identity` is implicitly acceptable at the lowest non-zero
/// listed quality unless the header names it or `*`.
fn parse_accept_encoding(accept_encoding: &str) -> Vec<AcceptedCoding<'_>> {
    let mut accepted = Vec::new();
    let mut has_identity = false;
    let mut min_q: f32 = 1.0;

    for part in accept_encoding.split(',') {
        let coding = part.split(';').next().unwrap_or("").trim();
        if coding.is_empty() {
            continue;
        }

        let q = parse_quality(part);
        has_identity |= coding.eq_ignore_ascii_case("identity") || coding == "*";
        if q > 0.0 {
            min_q = min_q.min(q);
        }

        accepted.push(AcceptedCoding {
            coding,
            q,
            order: accepted.len(),
        });
    }

    if !has_identity {
        accepted.push(AcceptedCoding {
            coding: "identity",
            q: min_q,
            order: accepted.len(),
        });
    }

    accepted
}

fn priority_of(candidate: &str, accepted: &[AcceptedCoding<'_>]) -> Option<Priority> {
    let mut best: Option<Priority> = None;

    for entry in accepted {
        let specificity = if entry.coding.eq_ignore_ascii_case(candidate) {
            1
        } else if entry.coding == "*" {
            0
        } else {
            continue;
        };

        let better = match best {
            None => true,
            Some(b) => (specificity, entry.q) > (b.specificity, b.q),
        };

        if better {
            best = Some(Priority {
                q: entry.q,
                specificity,
                order: entry.order,
            });
        }
    }

    best
}

/// Picks the encoding the client prefers among `candidates`.
///
/// Ordering: quality, then exact match over `*`, then header position, then
/// candidate position. Codings with `q=0` are never chosen. A missing header
/// accepts `identity` only.
pub fn preferred_encoding<'a>(accept_encoding: Option<&str>, candidates: &[&'a str]) -> Option<&'a str> {
    let accepted = parse_accept_encoding(accept_encoding.unwrap_or(""));

    let mut ranked: Vec<(usize, &'a str, Priority)> = candidates
        .iter()
        .enumerate()
        .filter_map(|(i, candidate)| {
            priority_of(candidate, &accepted)
                .filter(|p| p.q > 0.0)
                .map(|p| (i, *candidate, p))
        })
        .collect();

    ranked.sort_by(|(ia, _, a), (ib, _, b)| {
        b.q.total_cmp(&a.q)
            .then(b.specificity.cmp(&a.specificity))
            .then(a.order.cmp(&b.order))
            .then(ia.cmp(ib))
    });

    ranked.first().map(|(_, candidate, _)| *candidate)
}

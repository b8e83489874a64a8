//! Naming resolver: title-case identifiers ↔ snake-case column/tag names.
//!
//! Consulted only when a field carries no explicit source name in its
//! annotation; the convention is "field X binds the column or tag named
//! `to_snake(X)`".

/// `MeasurementName` → `measurement_name`. A separator is inserted before an
/// upper-case letter that follows a non-upper character, never inside a
/// continuous upper-case run.
pub fn to_snake(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    let mut last_upper = true;
    for c in s.chars() {
        if c.is_uppercase() {
            if !last_upper {
                out.push('_');
            }
            last_upper = true;
            out.extend(c.to_lowercase());
        } else {
            last_upper = false;
            out.push(c);
        }
    }
    out
}

/// `measurement_name` → `MeasurementName`.
pub fn to_title(s: &str) -> String {
    s.split('_')
        .map(|seg| {
            let mut chars = seg.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_basic() {
        assert_eq!(to_snake("MeasurementName"), "measurement_name");
        assert_eq!(to_snake("Time"), "time");
        assert_eq!(to_snake("already_snake"), "already_snake");
    }

    #[test]
    fn snake_keeps_upper_runs_together() {
        assert_eq!(to_snake("CPUTime"), "cputime");
        assert_eq!(to_snake("HostCPU"), "host_cpu");
    }

    #[test]
    fn title_basic() {
        assert_eq!(to_title("measurement_name"), "MeasurementName");
        assert_eq!(to_title("load"), "Load");
    }

    #[test]
    fn title_snake_round_trip() {
        for s in ["measurement_name", "host", "cpu_usage_idle", "a_b_c"] {
            assert_eq!(to_snake(&to_title(s)), s);
        }
    }
}

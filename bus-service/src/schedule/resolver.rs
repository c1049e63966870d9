//! Shifting a route's base schedule onto one stop.

use chrono::NaiveTime;

use crate::domain::{OffsetMinutes, RouteCode, RouteSchedule};

/// When a route reaches a particular stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveDeparture {
    pub time: NaiveTime,
    pub is_weekday: bool,
    pub comments: Option<String>,
}

/// Compute the arrival times at a stop `offset` minutes into route
/// `route_code`.
///
/// Rows of `base` for other routes are skipped. The output keeps the order
/// of `base` and is not re-sorted by effective time. Times wrap past
/// midnight.
///
/// # Examples
///
/// ```
/// use chrono::NaiveTime;
/// use bus_service::domain::{OffsetMinutes, RouteCode, RouteSchedule};
/// use bus_service::schedule::resolve_effective_schedule;
///
/// let route = RouteCode::parse("12").unwrap();
/// let base = vec![RouteSchedule {
///     id: 1,
///     route_code: route.clone(),
///     start_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
///     is_weekday: true,
///     comments: None,
/// }];
///
/// let resolved = resolve_effective_schedule(&route, OffsetMinutes::new(10).unwrap(), &base);
/// assert_eq!(resolved[0].time, NaiveTime::from_hms_opt(8, 10, 0).unwrap());
/// ```
pub fn resolve_effective_schedule(
    route_code: &RouteCode,
    offset: OffsetMinutes,
    base: &[RouteSchedule],
) -> Vec<EffectiveDeparture> {
    let shift = offset.as_duration();
    base.iter()
        .filter(|entry| entry.route_code == *route_code)
        .map(|entry| EffectiveDeparture {
            time: entry.start_time.overflowing_add_signed(shift).0,
            is_weekday: entry.is_weekday,
            comments: entry.comments.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn code(s: &str) -> RouteCode {
        RouteCode::parse(s).unwrap()
    }

    fn entry(route: &str, time: NaiveTime, is_weekday: bool) -> RouteSchedule {
        RouteSchedule {
            id: 0,
            route_code: code(route),
            start_time: time,
            is_weekday,
            comments: None,
        }
    }

    fn offset(minutes: i64) -> OffsetMinutes {
        OffsetMinutes::new(minutes).unwrap()
    }

    #[test]
    fn shifts_by_offset() {
        let base = vec![entry("12", hm(8, 0), true), entry("12", hm(8, 30), true)];
        let resolved = resolve_effective_schedule(&code("12"), offset(10), &base);

        let times: Vec<NaiveTime> = resolved.iter().map(|d| d.time).collect();
        assert_eq!(times, vec![hm(8, 10), hm(8, 40)]);
        assert!(resolved.iter().all(|d| d.is_weekday));
    }

    #[test]
    fn carries_flags_and_comments() {
        let mut weekend = entry("12", hm(9, 0), false);
        weekend.comments = Some("Holiday service".into());
        let resolved = resolve_effective_schedule(&code("12"), offset(0), &[weekend]);

        assert_eq!(
            resolved,
            vec![EffectiveDeparture {
                time: hm(9, 0),
                is_weekday: false,
                comments: Some("Holiday service".into()),
            }]
        );
    }

    #[test]
    fn ignores_other_routes() {
        let base = vec![
            entry("12", hm(8, 0), true),
            entry("7", hm(8, 5), true),
            entry("12", hm(8, 30), true),
        ];
        let resolved = resolve_effective_schedule(&code("12"), offset(1), &base);
        let times: Vec<NaiveTime> = resolved.iter().map(|d| d.time).collect();
        assert_eq!(times, vec![hm(8, 1), hm(8, 31)]);
    }

    #[test]
    fn keeps_input_order() {
        let base = vec![entry("12", hm(23, 50), true), entry("12", hm(6, 0), true)];
        let resolved = resolve_effective_schedule(&code("12"), offset(20), &base);
        let times: Vec<NaiveTime> = resolved.iter().map(|d| d.time).collect();
        assert_eq!(times, vec![hm(0, 10), hm(6, 20)]);
    }

    #[test]
    fn empty_base() {
        assert!(resolve_effective_schedule(&code("12"), offset(5), &[]).is_empty());
    }
}

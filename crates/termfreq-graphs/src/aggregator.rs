//! Shaping a post collection into a calendar-complete, counted table

use crate::types::{ShapedRow, ShapedTable};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};
use termfreq_common::Post;
use tracing::{debug, instrument};

/// Every day from `since` to `until`, both inclusive.
///
/// An inverted window yields no days.
pub fn calendar_skeleton(since: NaiveDate, until: NaiveDate) -> Vec<NaiveDate> {
    if since > until {
        return Vec::new();
    }
    std::iter::successors(Some(since), |day| day.succ_opt())
        .take_while(|day| *day <= until)
        .collect()
}

fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

fn year_key(date: NaiveDate) -> String {
    date.format("%Y").to_string()
}

/// Left-join posts onto the calendar of `[since, until]` and count them per
/// day, month and year.
///
/// Posts are joined on their UTC date in timestamp order; posts outside the
/// window are dropped by the join and do not count. A day without posts
/// still gets one row, with no post and a day count of zero. The input is
/// left untouched.
#[instrument(skip(posts), fields(posts = posts.len()))]
pub fn shape(posts: &[Post], since: NaiveDate, until: NaiveDate) -> ShapedTable {
    let mut sorted: Vec<&Post> = posts.iter().collect();
    sorted.sort_by_key(|post| post.timestamp);

    let mut by_date: BTreeMap<NaiveDate, Vec<&Post>> = BTreeMap::new();
    for post in sorted {
        let date = post.date();
        if (since..=until).contains(&date) {
            by_date.entry(date).or_default().push(post);
        }
    }

    let mut month_counts: HashMap<String, u64> = HashMap::new();
    let mut year_counts: HashMap<String, u64> = HashMap::new();
    for (date, day_posts) in &by_date {
        *month_counts.entry(month_key(*date)).or_default() += day_posts.len() as u64;
        *year_counts.entry(year_key(*date)).or_default() += day_posts.len() as u64;
    }

    let skeleton = calendar_skeleton(since, until);
    let mut rows = Vec::with_capacity(skeleton.len());

    for date in skeleton {
        let year_month = month_key(date);
        let year = year_key(date);
        let count_months = month_counts.get(&year_month).copied().unwrap_or(0);
        let count_years = year_counts.get(&year).copied().unwrap_or(0);

        let row = |post: Option<Post>, count_days: u64| ShapedRow {
            date,
            post,
            year_month: year_month.clone(),
            year: year.clone(),
            count_days,
            count_months,
            count_years,
        };

        match by_date.get(&date) {
            Some(day_posts) => {
                let count_days = day_posts.len() as u64;
                rows.extend(day_posts.iter().map(|post| row(Some((*post).clone()), count_days)));
            }
            None => rows.push(row(None, 0)),
        }
    }

    let joined = by_date.values().map(Vec::len).sum::<usize>();
    debug!(
        rows = rows.len(),
        joined,
        dropped = posts.len() - joined,
        "Shaped post collection"
    );

    ShapedTable::from_rows(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use termfreq_common::test_utils::{date, mock_timestamp, post_fixtures::post_at};
    use termfreq_common::Granularity;

    #[test]
    fn test_skeleton_is_inclusive() {
        let days = calendar_skeleton(date(2021, 1, 30), date(2021, 2, 2));
        assert_eq!(
            days,
            vec![
                date(2021, 1, 30),
                date(2021, 1, 31),
                date(2021, 2, 1),
                date(2021, 2, 2)
            ]
        );
    }

    #[test]
    fn test_skeleton_single_day_and_inverted() {
        assert_eq!(calendar_skeleton(date(2021, 1, 1), date(2021, 1, 1)).len(), 1);
        assert!(calendar_skeleton(date(2021, 1, 2), date(2021, 1, 1)).is_empty());
    }

    #[test]
    fn test_skeleton_leap_year() {
        assert_eq!(calendar_skeleton(date(2020, 2, 1), date(2020, 3, 1)).len(), 30);
    }

    #[test]
    fn test_zero_posts() {
        let table = shape(&[], date(2021, 1, 1), date(2021, 1, 3));

        assert_eq!(table.len(), 3);
        for row in table.rows() {
            assert!(row.post.is_none());
            assert_eq!(row.count_days, 0);
            assert_eq!(row.count_months, 0);
            assert_eq!(row.count_years, 0);
        }
    }

    #[test]
    fn test_single_post() {
        let post = post_at(1, mock_timestamp(2021, 1, 2, 14, 0, 0));
        let table = shape(&[post.clone()], date(2021, 1, 1), date(2021, 1, 3));

        assert_eq!(table.len(), 3);
        let rows = table.rows();

        assert_eq!(rows[1].date, date(2021, 1, 2));
        assert_eq!(rows[1].post.as_ref(), Some(&post));
        assert_eq!(
            (rows[1].count_days, rows[1].count_months, rows[1].count_years),
            (1, 1, 1)
        );

        for row in [&rows[0], &rows[2]] {
            assert!(row.post.is_none());
            assert_eq!(row.count_days, 0);
            // Same month and year as the post
            assert_eq!(row.count_months, 1);
            assert_eq!(row.count_years, 1);
        }
    }

    #[test]
    fn test_posts_sorted_within_day() {
        let late = post_at(1, mock_timestamp(2021, 1, 2, 23, 0, 0));
        let early = post_at(2, mock_timestamp(2021, 1, 2, 1, 0, 0));
        let table = shape(&[late.clone(), early.clone()], date(2021, 1, 2), date(2021, 1, 2));

        let ids: Vec<_> = table.matched_posts().map(|p| p.post_id.clone()).collect();
        assert_eq!(ids, vec![early.post_id, late.post_id]);
        assert!(table.rows().iter().all(|row| row.count_days == 2));
    }

    #[test]
    fn test_posts_outside_window_are_dropped() {
        let posts = vec![
            post_at(1, mock_timestamp(2020, 12, 31, 23, 59, 59)),
            post_at(2, mock_timestamp(2021, 1, 1, 0, 0, 0)),
            post_at(3, mock_timestamp(2021, 1, 4, 0, 0, 0)),
        ];
        let table = shape(&posts, date(2021, 1, 1), date(2021, 1, 3));

        assert_eq!(table.matched_posts().count(), 1);
        assert_eq!(table.rows()[0].count_years, 1);
    }

    #[test]
    fn test_counts_across_months_and_years() {
        let posts = termfreq_common::test_utils::post_fixtures::sample_posts();
        let table = shape(&posts, date(2021, 1, 1), date(2022, 1, 31));

        let jan = table.series(Granularity::Month);
        assert_eq!(jan.points[0].label, "2021-01");
        assert_eq!(jan.points[0].count, 4);
        assert_eq!(jan.points[1].label, "2021-02");
        assert_eq!(jan.points[1].count, 1);
        assert_eq!(jan.len(), 13);
        assert_eq!(jan.total(), 6);

        let years = table.series(Granularity::Year);
        assert_eq!(years.labels(), vec!["2021", "2022"]);
        assert_eq!(years.points[0].count, 5);
        assert_eq!(years.points[1].count, 1);
    }

    #[test]
    fn test_day_series_has_one_bar_per_day() {
        let posts = termfreq_common::test_utils::post_fixtures::sample_posts();
        let table = shape(&posts, date(2021, 1, 1), date(2021, 1, 3));
        let days = table.series(Granularity::Day);

        assert_eq!(days.labels(), vec!["2021-01-01", "2021-01-02", "2021-01-03"]);
        assert_eq!(
            days.points.iter().map(|p| p.count).collect::<Vec<_>>(),
            vec![0, 2, 0]
        );
    }

    #[test]
    fn test_shaping_is_idempotent_and_pure() {
        let posts = termfreq_common::test_utils::post_fixtures::sample_posts();
        let before = posts.clone();

        let first = shape(&posts, date(2021, 1, 1), date(2021, 12, 31));
        let second = shape(&posts, date(2021, 1, 1), date(2021, 12, 31));

        assert_eq!(first, second);
        assert_eq!(posts, before);
    }
}

#[cfg(test)]
mod tests {
    use crate::analytics::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use common::models::{Actor, PrState, PullRequest, Review, ReviewState};

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, day, hour, 0, 0).unwrap()
    }

    fn actor(login: &str) -> Actor {
        Actor {
            login: login.to_string(),
            avatar_url: format!("https://avatars.example/{}", login),
        }
    }

    fn make_pr(number: i32, author: &str, created_at: DateTime<Utc>) -> PullRequest {
        PullRequest {
            id: i64::from(number) * 10,
            number,
            title: format!("PR {}", number),
            body: None,
            html_url: String::new(),
            state: PrState::Open,
            created_at,
            updated_at: created_at,
            closed_at: None,
            merged_at: None,
            user: actor(author),
            labels: vec![],
            assignees: vec![],
            requested_reviewers: vec![],
            additions: 0,
            deletions: 0,
            commits: 1,
            draft: false,
        }
    }

    fn merged(mut pr: PullRequest, merged_at: DateTime<Utc>) -> PullRequest {
        pr.state = PrState::Closed;
        pr.merged_at = Some(merged_at);
        pr.closed_at = Some(merged_at);
        pr.updated_at = merged_at;
        pr
    }

    fn make_review(id: i64, reviewer: &str, state: ReviewState, at: DateTime<Utc>) -> Review {
        Review {
            id,
            user: actor(reviewer),
            body: String::new(),
            state,
            submitted_at: Some(at),
            pull_request_url: String::new(),
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    // time_metrics tests
    #[test]
    fn test_time_metrics_no_reviews_open_pr() {
        let created = at(1, 0);
        let now = at(4, 12);
        let pr = make_pr(1, "alice", created);

        let tm = time_metrics_at(&pr, &[], now);
        assert_eq!(tm.creation_to_first_review, 0.0);
        assert_eq!(tm.first_review_to_approval, 0.0);
        assert_eq!(tm.approval_to_merge, 0.0);
        assert!(approx(tm.total_time, 3.5));
    }

    #[test]
    fn test_time_metrics_full_cycle() {
        let created = at(1, 0);
        let merged_at = at(6, 0);
        let pr = merged(make_pr(1, "alice", created), merged_at);
        let reviews = vec![
            make_review(2, "carol", ReviewState::Approved, created + Duration::days(2)),
            make_review(1, "bob", ReviewState::Commented, created + Duration::days(1)),
        ];

        let tm = time_metrics_at(&pr, &reviews, at(20, 0));
        assert!(approx(tm.creation_to_first_review, 1.0));
        assert!(approx(tm.first_review_to_approval, 1.0));
        assert!(approx(tm.approval_to_merge, 3.0));
        assert!(approx(tm.total_time, 5.0));
    }

    #[test]
    fn test_time_metrics_ignores_pending_reviews() {
        let created = at(1, 0);
        let pr = make_pr(1, "alice", created);
        let reviews = vec![
            make_review(1, "bob", ReviewState::Pending, created + Duration::hours(1)),
            make_review(2, "bob", ReviewState::ChangesRequested, created + Duration::hours(12)),
        ];

        let tm = time_metrics_at(&pr, &reviews, at(3, 0));
        assert!(approx(tm.creation_to_first_review, 0.5));
        assert_eq!(tm.first_review_to_approval, 0.0);
    }

    #[test]
    fn test_time_metrics_closed_pr_ends_at_close() {
        let created = at(1, 0);
        let mut pr = make_pr(1, "alice", created);
        pr.state = PrState::Closed;
        pr.closed_at = Some(at(3, 0));

        let tm = time_metrics_at(&pr, &[], at(25, 0));
        assert!(approx(tm.total_time, 2.0));
        assert_eq!(tm.approval_to_merge, 0.0);
    }

    #[test]
    fn test_time_metrics_approval_without_merge() {
        let created = at(1, 0);
        let pr = make_pr(1, "alice", created);
        let reviews = vec![make_review(
            1,
            "bob",
            ReviewState::Approved,
            created + Duration::days(1),
        )];

        let tm = time_metrics_at(&pr, &reviews, at(5, 0));
        assert!(approx(tm.creation_to_first_review, 1.0));
        // Approval is itself the first review
        assert_eq!(tm.first_review_to_approval, 0.0);
        assert_eq!(tm.approval_to_merge, 0.0);
    }

    // pr_analytics tests
    #[test]
    fn test_pr_analytics_empty() {
        let analytics = pr_analytics_at(&[], &ReviewMap::new(), at(1, 0));
        assert_eq!(analytics.total_prs, 0);
        assert_eq!(analytics.avg_time_to_first_review, 0.0);
        assert_eq!(analytics.avg_life_cycle, 0.0);
        assert_eq!(analytics.avg_development_time, 0.0);
        assert!(!analytics.avg_time_to_approval.is_nan());
    }

    #[test]
    fn test_pr_analytics_excludes_unreviewed_from_first_review_average() {
        let created = at(1, 0);
        let reviewed = make_pr(1, "alice", created);
        let unreviewed = make_pr(2, "bob", created);

        let mut reviews = ReviewMap::new();
        reviews.insert(
            1,
            vec![make_review(1, "carol", ReviewState::Commented, created + Duration::days(2))],
        );

        let analytics = pr_analytics_at(&[reviewed, unreviewed], &reviews, at(10, 0));
        assert!(approx(analytics.avg_time_to_first_review, 2.0));
        assert_eq!(analytics.reviewed_prs, 1);
        assert_eq!(analytics.pending_review_prs, 1);
    }

    #[test]
    fn test_pr_analytics_counts() {
        let created = at(1, 0);
        let open = make_pr(1, "alice", created);
        let done = merged(make_pr(2, "bob", created), at(3, 0));
        let mut closed = make_pr(3, "carol", created);
        closed.state = PrState::Closed;
        closed.closed_at = Some(at(2, 0));

        let mut reviews = ReviewMap::new();
        reviews.insert(2, vec![make_review(1, "alice", ReviewState::Pending, at(1, 6))]);
        reviews.insert(3, vec![]);

        let analytics = pr_analytics_at(&[open, done, closed], &reviews, at(5, 0));
        assert_eq!(analytics.total_prs, 3);
        assert_eq!(analytics.open_prs, 1);
        // A pending review still marks the PR as reviewed
        assert_eq!(analytics.reviewed_prs, 1);
        assert_eq!(analytics.pending_review_prs, 2);
        // Pending reviews never count as a first review
        assert_eq!(analytics.avg_time_to_first_review, 0.0);
    }

    #[test]
    fn test_pr_analytics_response_time_matches_approval() {
        let created = at(1, 0);
        let pr = merged(make_pr(1, "alice", created), at(5, 0));
        let mut reviews = ReviewMap::new();
        reviews.insert(
            1,
            vec![
                make_review(1, "bob", ReviewState::Commented, at(2, 0)),
                make_review(2, "bob", ReviewState::Approved, at(3, 12)),
            ],
        );

        let analytics = pr_analytics_at(&[pr], &reviews, at(9, 0));
        assert!(approx(analytics.avg_time_to_approval, 1.5));
        assert_eq!(analytics.avg_response_time, analytics.avg_time_to_approval);
        assert!(approx(analytics.avg_life_cycle, 4.0));
    }

    #[test]
    fn test_pr_analytics_development_time_is_unfiltered() {
        let created = at(1, 0);
        let untouched = make_pr(1, "alice", created);
        let mut updated = make_pr(2, "bob", created);
        updated.updated_at = at(3, 0);

        let analytics = pr_analytics_at(&[untouched, updated], &ReviewMap::new(), at(9, 0));
        // (0 + 2) / 2, the untouched PR still counts
        assert!(approx(analytics.avg_development_time, 1.0));
    }

    // user_metrics tests
    #[test]
    fn test_user_metrics_merges_roles() {
        let created = at(1, 0);
        let mut pr = make_pr(1, "alice", created);
        pr.additions = 120;
        pr.deletions = 30;

        let mut reviews = ReviewMap::new();
        reviews.insert(
            1,
            vec![
                make_review(1, "bob", ReviewState::Commented, at(1, 5)),
                make_review(2, "bob", ReviewState::Approved, at(1, 9)),
            ],
        );
        let other = make_pr(2, "bob", created);
        reviews.insert(2, vec![make_review(3, "alice", ReviewState::Commented, at(2, 0))]);

        let users = user_metrics(&[pr, other], &reviews);
        assert_eq!(users.len(), 2);

        let bob = &users[0];
        assert_eq!(bob.username, "bob");
        assert_eq!(bob.total_prs, 1);
        assert_eq!(bob.reviews_given, 2);
        assert_eq!(bob.total_interactions, 3);

        let alice = &users[1];
        assert_eq!(alice.lines_added, 120);
        assert_eq!(alice.lines_removed, 30);
        assert_eq!(alice.reviews_given, 1);
        assert_eq!(alice.total_interactions, 2);
        assert_eq!(alice.avatar_url, "https://avatars.example/alice");
    }

    #[test]
    fn test_user_metrics_reviewer_seeded_with_review_avatar() {
        let pr = make_pr(1, "alice", at(1, 0));
        let mut review = make_review(1, "dave", ReviewState::Commented, at(1, 3));
        review.user.avatar_url = "https://review-avatar".to_string();
        let mut reviews = ReviewMap::new();
        reviews.insert(1, vec![review]);

        let users = user_metrics(&[pr], &reviews);
        let dave = users.iter().find(|u| u.username == "dave").unwrap();
        assert_eq!(dave.avatar_url, "https://review-avatar");
        assert_eq!(dave.total_prs, 0);
    }

    #[test]
    fn test_user_metrics_stable_on_ties() {
        let created = at(1, 0);
        // Interactions: ana 5, bia 3, caio 5
        let mut prs = Vec::new();
        let mut number = 0;
        for (login, count) in [("ana", 5), ("bia", 3), ("caio", 5)] {
            for _ in 0..count {
                number += 1;
                prs.push(make_pr(number, login, created));
            }
        }

        let users = user_metrics(&prs, &ReviewMap::new());
        let order: Vec<&str> = users.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(order, vec!["ana", "caio", "bia"]);
    }

    #[test]
    fn test_user_metrics_reviewers_follow_pr_order() {
        let created = at(1, 0);
        // Listed most recently updated first, not by number
        let prs = vec![make_pr(3, "alice", created), make_pr(2, "bob", created)];
        let mut reviews = ReviewMap::new();
        reviews.insert(3, vec![make_review(1, "dave", ReviewState::Commented, at(2, 0))]);
        reviews.insert(2, vec![make_review(2, "erin", ReviewState::Approved, at(2, 0))]);

        let users = user_metrics(&prs, &reviews);
        let order: Vec<&str> = users.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(order, vec!["alice", "bob", "dave", "erin"]);
    }

    #[test]
    fn test_user_metrics_time_to_merge_is_true_mean() {
        let created = at(1, 0);
        let prs = vec![
            merged(make_pr(1, "alice", created), created + Duration::days(1)),
            merged(make_pr(2, "alice", created), created + Duration::days(2)),
            merged(make_pr(3, "alice", created), created + Duration::days(6)),
            make_pr(4, "alice", created),
        ];

        let users = user_metrics(&prs, &ReviewMap::new());
        assert!(approx(users[0].avg_time_to_merge, 3.0));
        assert_eq!(users[0].total_prs, 4);
    }

    #[test]
    fn test_user_metrics_deterministic() {
        let created = at(1, 0);
        let prs = vec![
            merged(make_pr(1, "alice", created), at(2, 0)),
            make_pr(2, "bob", created),
            make_pr(3, "carol", created),
        ];
        let mut reviews = ReviewMap::new();
        reviews.insert(3, vec![make_review(1, "bob", ReviewState::Approved, at(2, 0))]);
        reviews.insert(1, vec![make_review(2, "carol", ReviewState::Commented, at(1, 5))]);

        let first = user_metrics(&prs, &reviews);
        let second = user_metrics(&prs, &reviews);
        assert_eq!(first, second);
    }

    #[test]
    fn test_user_metrics_empty() {
        assert!(user_metrics(&[], &ReviewMap::new()).is_empty());
    }
}

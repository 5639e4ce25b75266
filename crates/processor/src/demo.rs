//! Offline fixtures served for the demo token
//!
//! Timestamps are laid out relative to the moment the data is generated so
//! the demo repository always looks active.

use chrono::{DateTime, Duration, Utc};
use common::models::{
    Actor, Comment, Commit, Label, PrAiMetrics, PrState, PullRequest, RepoOwner, Repository,
    Review, ReviewState, User,
};

use crate::analytics::ReviewMap;

/// Reserved token that switches every collaborator to these fixtures
pub const DEMO_TOKEN: &str = "demo_token_12345";

pub const DEMO_OWNER: &str = "demo_user";
pub const DEMO_REPO: &str = "projeto-demo";

const COLLABORATORS: [(&str, &str); 10] = [
    ("ana_silva", "Ana Silva"),
    ("bruno_costa", "Bruno Costa"),
    ("carla_santos", "Carla Santos"),
    ("daniel_oliveira", "Daniel Oliveira"),
    ("fernanda_lima", "Fernanda Lima"),
    ("gabriel_rocha", "Gabriel Rocha"),
    ("helena_martins", "Helena Martins"),
    ("igor_ferreira", "Igor Ferreira"),
    ("julia_alves", "Julia Alves"),
    ("leonardo_souza", "Leonardo Souza"),
];

#[derive(Clone, Copy)]
enum Outcome {
    Open,
    /// Merged this many hours after creation
    Merged(i64),
    /// Closed unmerged this many hours after creation
    Closed(i64),
}

struct PrSeed {
    title: &'static str,
    author: usize,
    created_hours_ago: i64,
    outcome: Outcome,
    additions: i64,
    deletions: i64,
    commits: i64,
    labels: &'static [(&'static str, &'static str)],
    reviewer_requested: Option<usize>,
}

const SEEDS: [PrSeed; 20] = [
    PrSeed {
        title: "Add JWT authentication",
        author: 0,
        created_hours_ago: 190,
        outcome: Outcome::Merged(70),
        additions: 450,
        deletions: 120,
        commits: 8,
        labels: &[("feature", "0e8a16"), ("security", "d73a4a")],
        reviewer_requested: None,
    },
    PrSeed {
        title: "Unit tests for the payments module",
        author: 1,
        created_hours_ago: 140,
        outcome: Outcome::Merged(60),
        additions: 320,
        deletions: 45,
        commits: 5,
        labels: &[("test", "fbca04")],
        reviewer_requested: None,
    },
    PrSeed {
        title: "Fix duplicated items in the cart",
        author: 2,
        created_hours_ago: 96,
        outcome: Outcome::Merged(40),
        additions: 85,
        deletions: 62,
        commits: 3,
        labels: &[("bug", "d73a4a")],
        reviewer_requested: None,
    },
    PrSeed {
        title: "Optimize hot database queries",
        author: 3,
        created_hours_ago: 170,
        outcome: Outcome::Merged(96),
        additions: 210,
        deletions: 180,
        commits: 6,
        labels: &[("performance", "5319e7")],
        reviewer_requested: None,
    },
    PrSeed {
        title: "Metrics dashboard components",
        author: 4,
        created_hours_ago: 120,
        outcome: Outcome::Open,
        additions: 780,
        deletions: 35,
        commits: 12,
        labels: &[("feature", "0e8a16")],
        reviewer_requested: Some(5),
    },
    PrSeed {
        title: "Experimental GraphQL endpoint",
        author: 5,
        created_hours_ago: 200,
        outcome: Outcome::Closed(50),
        additions: 540,
        deletions: 10,
        commits: 7,
        labels: &[("experiment", "c5def5")],
        reviewer_requested: None,
    },
    PrSeed {
        title: "Refactor form components",
        author: 6,
        created_hours_ago: 110,
        outcome: Outcome::Merged(30),
        additions: 260,
        deletions: 310,
        commits: 9,
        labels: &[("refactor", "1d76db")],
        reviewer_requested: None,
    },
    PrSeed {
        title: "Stripe payment integration",
        author: 7,
        created_hours_ago: 150,
        outcome: Outcome::Merged(80),
        additions: 690,
        deletions: 40,
        commits: 11,
        labels: &[("feature", "0e8a16"), ("payments", "bfd4f2")],
        reviewer_requested: None,
    },
    PrSeed {
        title: "Real-time notifications over WebSockets",
        author: 8,
        created_hours_ago: 72,
        outcome: Outcome::Open,
        additions: 430,
        deletions: 25,
        commits: 10,
        labels: &[("feature", "0e8a16")],
        reviewer_requested: Some(0),
    },
    PrSeed {
        title: "Responsive layout fixes",
        author: 9,
        created_hours_ago: 60,
        outcome: Outcome::Merged(20),
        additions: 95,
        deletions: 70,
        commits: 4,
        labels: &[("ui", "fef2c0")],
        reviewer_requested: None,
    },
    PrSeed {
        title: "Swagger API documentation",
        author: 0,
        created_hours_ago: 130,
        outcome: Outcome::Merged(48),
        additions: 380,
        deletions: 15,
        commits: 5,
        labels: &[("docs", "0075ca")],
        reviewer_requested: None,
    },
    PrSeed {
        title: "Redis response cache",
        author: 1,
        created_hours_ago: 100,
        outcome: Outcome::Merged(36),
        additions: 240,
        deletions: 60,
        commits: 6,
        labels: &[("performance", "5319e7")],
        reviewer_requested: None,
    },
    PrSeed {
        title: "Dark theme",
        author: 2,
        created_hours_ago: 44,
        outcome: Outcome::Open,
        additions: 310,
        deletions: 120,
        commits: 7,
        labels: &[("ui", "fef2c0")],
        reviewer_requested: Some(3),
    },
    PrSeed {
        title: "CI/CD with GitHub Actions",
        author: 3,
        created_hours_ago: 90,
        outcome: Outcome::Merged(26),
        additions: 140,
        deletions: 5,
        commits: 3,
        labels: &[("ci", "ededed")],
        reviewer_requested: None,
    },
    PrSeed {
        title: "Elasticsearch product search",
        author: 4,
        created_hours_ago: 180,
        outcome: Outcome::Merged(110),
        additions: 820,
        deletions: 90,
        commits: 15,
        labels: &[("feature", "0e8a16")],
        reviewer_requested: None,
    },
    PrSeed {
        title: "Form validation messages",
        author: 5,
        created_hours_ago: 36,
        outcome: Outcome::Open,
        additions: 160,
        deletions: 40,
        commits: 4,
        labels: &[("enhancement", "a2eeef")],
        reviewer_requested: None,
    },
    PrSeed {
        title: "File upload with image preview",
        author: 6,
        created_hours_ago: 80,
        outcome: Outcome::Closed(30),
        additions: 350,
        deletions: 20,
        commits: 6,
        labels: &[("feature", "0e8a16")],
        reviewer_requested: None,
    },
    PrSeed {
        title: "Fix memory leak in the worker",
        author: 7,
        created_hours_ago: 48,
        outcome: Outcome::Merged(22),
        additions: 55,
        deletions: 48,
        commits: 2,
        labels: &[("bug", "d73a4a"), ("critical", "b60205")],
        reviewer_requested: None,
    },
    PrSeed {
        title: "Internationalization (i18n)",
        author: 8,
        created_hours_ago: 116,
        outcome: Outcome::Open,
        additions: 620,
        deletions: 205,
        commits: 14,
        labels: &[("feature", "0e8a16"), ("enhancement", "a2eeef")],
        reviewer_requested: Some(9),
    },
    PrSeed {
        title: "Structured JSON logging",
        author: 9,
        created_hours_ago: 140,
        outcome: Outcome::Merged(44),
        additions: 170,
        deletions: 92,
        commits: 4,
        labels: &[("enhancement", "a2eeef")],
        reviewer_requested: None,
    },
];

struct AiSeed {
    tools: &'static str,
    scenarios: &'static str,
    score: i32,
    reason: &'static str,
}

const AI_SEEDS: [Option<AiSeed>; 20] = [
    Some(AiSeed {
        tools: "GitHub Copilot, ChatGPT",
        scenarios: "JWT boilerplate, security review suggestions",
        score: 90,
        reason: "Copilot drafted the boilerplate and ChatGPT covered token handling patterns.",
    }),
    Some(AiSeed {
        tools: "GitHub Copilot",
        scenarios: "Unit test generation",
        score: 80,
        reason: "Test scaffolding and basic cases came from completions.",
    }),
    Some(AiSeed {
        tools: "ChatGPT",
        scenarios: "Debugging the cart duplication",
        score: 70,
        reason: "Narrowed down the root cause faster than manual bisecting.",
    }),
    Some(AiSeed {
        tools: "GitHub Copilot, ChatGPT",
        scenarios: "SQL tuning, index suggestions",
        score: 90,
        reason: "Suggested the composite indexes that fixed the slow queries.",
    }),
    Some(AiSeed {
        tools: "GitHub Copilot, ChatGPT",
        scenarios: "Component scaffolding, chart configuration",
        score: 80,
        reason: "Saved time on chart library configuration.",
    }),
    None,
    Some(AiSeed {
        tools: "GitHub Copilot",
        scenarios: "Refactoring patterns",
        score: 70,
        reason: "Proposed a cleaner component structure.",
    }),
    Some(AiSeed {
        tools: "ChatGPT, GitHub Copilot",
        scenarios: "Stripe API examples, integration code",
        score: 90,
        reason: "Clear integration examples shortened implementation.",
    }),
    Some(AiSeed {
        tools: "GitHub Copilot, ChatGPT",
        scenarios: "WebSocket connection handling",
        score: 80,
        reason: "Helped with reconnection and state management patterns.",
    }),
    Some(AiSeed {
        tools: "GitHub Copilot",
        scenarios: "Responsive CSS tweaks",
        score: 60,
        reason: "Media query suggestions still needed manual adjustment.",
    }),
    Some(AiSeed {
        tools: "ChatGPT",
        scenarios: "Swagger generation, usage examples",
        score: 90,
        reason: "Produced detailed docs and examples quickly.",
    }),
    Some(AiSeed {
        tools: "ChatGPT, GitHub Copilot",
        scenarios: "Redis setup, invalidation strategy",
        score: 80,
        reason: "Covered cache invalidation practices.",
    }),
    Some(AiSeed {
        tools: "GitHub Copilot",
        scenarios: "Theme variables",
        score: 70,
        reason: "Generated theme variables across components.",
    }),
    Some(AiSeed {
        tools: "ChatGPT",
        scenarios: "GitHub Actions workflows",
        score: 80,
        reason: "Full CI/CD configuration on the first try.",
    }),
    Some(AiSeed {
        tools: "ChatGPT, GitHub Copilot",
        scenarios: "Elasticsearch mappings, search queries",
        score: 90,
        reason: "Flattened the learning curve on index mappings.",
    }),
    Some(AiSeed {
        tools: "GitHub Copilot",
        scenarios: "Validation rules, error messages",
        score: 70,
        reason: "Consistent validation messages across forms.",
    }),
    Some(AiSeed {
        tools: "GitHub Copilot, ChatGPT",
        scenarios: "Upload handling, image preview",
        score: 80,
        reason: "Base upload code including error handling.",
    }),
    Some(AiSeed {
        tools: "ChatGPT",
        scenarios: "Memory leak analysis",
        score: 90,
        reason: "Spotted the retaining closure quickly.",
    }),
    Some(AiSeed {
        tools: "GitHub Copilot, ChatGPT",
        scenarios: "i18n setup, translations",
        score: 80,
        reason: "Generated locale files and wiring.",
    }),
    Some(AiSeed {
        tools: "ChatGPT",
        scenarios: "Logger configuration",
        score: 70,
        reason: "Complete logging setup with structured fields.",
    }),
];

fn collaborator(i: usize) -> Actor {
    let (login, _) = COLLABORATORS[i % COLLABORATORS.len()];
    Actor {
        login: login.to_string(),
        avatar_url: format!("https://api.dicebear.com/7.x/avataaars/svg?seed={}", login),
    }
}

/// A fully generated demo data set
#[derive(Debug, Clone)]
pub struct DemoData {
    pub user: User,
    pub repository: Repository,
    pub prs: Vec<PullRequest>,
    pub reviews: ReviewMap,
}

impl DemoData {
    pub fn generate(now: DateTime<Utc>) -> Self {
        let prs: Vec<PullRequest> = SEEDS
            .iter()
            .enumerate()
            .map(|(i, seed)| demo_pr(i as i32 + 1, seed, now))
            .collect();
        let reviews = prs
            .iter()
            .map(|pr| (pr.number, demo_reviews(pr)))
            .collect();

        Self {
            user: User {
                login: DEMO_OWNER.to_string(),
                id: 1,
                avatar_url: "https://api.dicebear.com/7.x/avataaars/svg?seed=demo".to_string(),
                name: Some("Demo User".to_string()),
                email: Some("demo@example.com".to_string()),
            },
            repository: Repository {
                id: 1,
                name: DEMO_REPO.to_string(),
                full_name: format!("{}/{}", DEMO_OWNER, DEMO_REPO),
                owner: RepoOwner {
                    login: DEMO_OWNER.to_string(),
                },
                private: false,
            },
            prs,
            reviews,
        }
    }

    pub fn is_demo_repo(&self, owner: &str, name: &str) -> bool {
        self.repository.owner.login == owner && self.repository.name == name
    }

    pub fn pr(&self, number: i32) -> Option<&PullRequest> {
        self.prs.iter().find(|pr| pr.number == number)
    }
}

fn demo_pr(number: i32, seed: &PrSeed, now: DateTime<Utc>) -> PullRequest {
    let created_at = now - Duration::hours(seed.created_hours_ago);
    let (state, merged_at, closed_at) = match seed.outcome {
        Outcome::Open => (PrState::Open, None, None),
        Outcome::Merged(h) => {
            let at = created_at + Duration::hours(h);
            (PrState::Closed, Some(at), Some(at))
        }
        Outcome::Closed(h) => (PrState::Closed, None, Some(created_at + Duration::hours(h))),
    };
    let updated_at =
        closed_at.unwrap_or_else(|| created_at + Duration::hours(seed.created_hours_ago / 2));

    PullRequest {
        id: i64::from(number),
        number,
        title: seed.title.to_string(),
        body: Some(format!("{}.", seed.title)),
        html_url: format!(
            "https://github.com/{}/{}/pull/{}",
            DEMO_OWNER, DEMO_REPO, number
        ),
        state,
        created_at,
        updated_at,
        closed_at,
        merged_at,
        user: collaborator(seed.author),
        labels: seed
            .labels
            .iter()
            .map(|(name, color)| Label {
                name: name.to_string(),
                color: color.to_string(),
            })
            .collect(),
        assignees: vec![],
        requested_reviewers: seed.reviewer_requested.map(collaborator).into_iter().collect(),
        additions: seed.additions,
        deletions: seed.deletions,
        commits: seed.commits,
        draft: false,
    }
}

/// 1-3 reviews per PR, four hours apart, never by the author
fn demo_reviews(pr: &PullRequest) -> Vec<Review> {
    let count = 1 + (pr.number as usize % 3);
    let author = SEEDS[(pr.number - 1) as usize].author;
    let states: &[ReviewState] = if pr.is_merged() {
        &[ReviewState::Commented, ReviewState::Approved]
    } else {
        &[
            ReviewState::ChangesRequested,
            ReviewState::Commented,
            ReviewState::Approved,
        ]
    };

    (0..count)
        .map(|i| Review {
            id: i64::from(pr.number) * 100 + i as i64,
            user: collaborator(author + 1 + (pr.number as usize + i) % 9),
            body: if i == 0 {
                "Looks good overall!".to_string()
            } else {
                "A few adjustments before merging.".to_string()
            },
            state: states[(i + pr.number as usize) % states.len()],
            submitted_at: Some(pr.created_at + Duration::hours(4 * (i as i64 + 1))),
            pull_request_url: pr.html_url.clone(),
        })
        .collect()
}

pub fn demo_commits(pr: &PullRequest) -> Vec<Commit> {
    (0..pr.commits)
        .map(|i| Commit {
            sha: format!("{:04x}{:036x}", pr.number, i * 0x9e37_79b9 + 1),
            message: if i == 0 {
                "Initial implementation".to_string()
            } else {
                format!("Update: iteration {}", i)
            },
            author_name: pr.user.login.clone(),
            authored_at: pr.created_at + Duration::hours(i * 2),
            author: Some(pr.user.clone()),
        })
        .collect()
}

pub fn demo_comments(pr: &PullRequest) -> Vec<Comment> {
    let count = 2 + (pr.number as usize % 5);
    (0..count)
        .map(|i| {
            let at = pr.created_at + Duration::hours(3 * (i as i64 + 1));
            Comment {
                id: i64::from(pr.number) * 1000 + i as i64,
                body: if i == 0 {
                    "Could you add a few tests?".to_string()
                } else {
                    "Suggestion: consider async/await here.".to_string()
                },
                user: collaborator(pr.number as usize + i),
                created_at: at,
                updated_at: at,
            }
        })
        .collect()
}

/// Fixture AI record for a demo PR
pub fn demo_ai_metrics(repository: &str, pr_number: i32) -> Option<PrAiMetrics> {
    if repository != format!("{}/{}", DEMO_OWNER, DEMO_REPO) || pr_number < 1 {
        return None;
    }
    let idx = usize::try_from(pr_number - 1).ok()?;
    let slot = AI_SEEDS.get(idx)?;

    // PRs without AI usage still have a record, just an empty one.
    Some(PrAiMetrics {
        id: i64::from(pr_number),
        repository: repository.to_string(),
        pr_number,
        ai_tools: slot
            .as_ref()
            .map(|s| common::models::split_tool_list(s.tools))
            .unwrap_or_default(),
        ai_usage_scenarios: slot.as_ref().map(|s| s.scenarios.to_string()),
        productivity_score: slot.as_ref().map(|s| s.score),
        productivity_reason: slot.as_ref().map(|s| s.reason.to_string()),
        updated_at: None,
    })
}

use chrono::{DateTime, Duration, TimeZone, Utc};
use politix::activity::classify;
use politix::prelude::*;
use politix::{
    filter_politicians, ActivityStatus, Bucket, FilterPipeline, PostMarker, SocialAccount,
    SocialAccounts,
};
use proptest::prelude::*;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

const PARTIES: [&str; 6] = [
    "Moderaterna",
    "Socialdemokraterna",
    "Liberalerna",
    "Miljöpartiet",
    "Sverigedemokraterna",
    "Piratpartiet",
];

fn arb_marker() -> impl Strategy<Value = PostMarker> {
    prop_oneof![
        Just(PostMarker::Absent),
        Just(PostMarker::Closed),
        Just(PostMarker::Protected),
        // Hour steps around the activity threshold, including the future
        (-24 * 400i64..24 * 400)
            .prop_map(|hours| PostMarker::Timestamp((now() - Duration::hours(hours)).to_rfc3339())),
        "[a-z0-9:T -]{0,16}".prop_map(|raw| PostMarker::from(Some(raw))),
    ]
}

fn arb_account() -> impl Strategy<Value = Option<SocialAccount>> {
    prop::option::of(arb_marker().prop_map(|marker| SocialAccount::new("handle", marker)))
}

fn arb_politician() -> impl Strategy<Value = Politician> {
    (
        "[A-Za-zÅÄÖåäöéô ]{1,12}",
        prop::option::of(prop::sample::select(PARTIES.to_vec())),
        arb_account(),
        arb_account(),
        arb_account(),
    )
        .prop_map(|(name, party, x, bluesky, mastodon)| Politician {
            id: format!("Q{}", name.len()),
            name,
            party: party.map(str::to_string),
            social: SocialAccounts { x, bluesky, mastodon },
        })
}

fn arb_politicians() -> impl Strategy<Value = Vec<Politician>> {
    prop::collection::vec(arb_politician(), 0..40)
}

fn arb_presence() -> impl Strategy<Value = Presence> {
    (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(x, bluesky, mastodon, none)| Presence {
            x,
            bluesky,
            mastodon,
            none,
        },
    )
}

fn arb_state() -> impl Strategy<Value = FilterState> {
    let party = prop::option::of(prop::sample::select(vec![
        "Moderaterna",
        "Piratpartiet",
        "Unknown",
        "Tidöpartierna",
        "Oppositionen",
        "Ingen sådan",
    ]));
    let platform = prop::sample::select(vec![
        Platform::All,
        Platform::X,
        Platform::Bluesky,
        Platform::Mastodon,
    ]);
    ("[aAöÖe ]{0,3}", party, platform, arb_presence()).prop_map(
        |(search, party, platform, presence)| {
            FilterState::default()
                .with_search(search)
                .with_party(party)
                .with_platform(platform)
                .with_presence(presence)
        },
    )
}

fn dashboard(politicians: Vec<Politician>, precomputed: bool) -> Dashboard {
    let local = Dashboard::new(politicians, None, Coalitions::default()).with_now(now());
    if precomputed {
        let doc = local.precompute();
        Dashboard::new(local.politicians().to_vec(), Some(doc), Coalitions::default()).with_now(now())
    } else {
        local
    }
}

fn rank(status: Option<ActivityStatus>) -> u8 {
    match status {
        Some(ActivityStatus::Active) => 0,
        Some(ActivityStatus::Inactive) => 1,
        Some(ActivityStatus::Closed) => 2,
        None => 3,
    }
}

fn names(list: &[&Politician]) -> Vec<String> {
    list.iter().map(|p| p.name.clone()).collect()
}

proptest! {
    #[test]
    fn buckets_sum_to_total_for_any_selection(
        politicians in arb_politicians(),
        state in arb_state(),
    ) {
        let dashboard = dashboard(politicians, false);
        let stats = dashboard.stats(&state);
        let scope = FilterPipeline::new(&state, dashboard.coalitions())
            .stats_scope(dashboard.politicians())
            .len();

        prop_assert!(stats.is_consistent(), "{:?}", stats);
        for platform in [Platform::All, Platform::X, Platform::Bluesky, Platform::Mastodon] {
            prop_assert_eq!(stats.get(platform).total, scope);
        }
    }

    #[test]
    fn all_bucket_follows_priority(politician in arb_politician()) {
        let expected = politician
            .social
            .slots()
            .map(|(_, account)| account.map(|a| classify(&a.last_post, now())))
            .min_by_key(|status| rank(*status))
            .flatten();
        let bucket = match expected {
            Some(ActivityStatus::Active) => Bucket::Active,
            Some(ActivityStatus::Inactive) => Bucket::Inactive,
            Some(ActivityStatus::Closed) => Bucket::Closed,
            None => Bucket::None,
        };

        let stats = politix::aggregate([&politician], now());
        prop_assert_eq!(stats.all.total, 1);
        prop_assert_eq!(stats.all.count(bucket), 1);
    }

    #[test]
    fn filtering_is_idempotent(
        politicians in arb_politicians(),
        state in arb_state(),
    ) {
        let coalitions = Coalitions::default();
        let once = filter_politicians(&politicians, &state, &coalitions);
        let again = filter_politicians(&politicians, &state, &coalitions);
        prop_assert_eq!(names(&once), names(&again));

        let kept: Vec<Politician> = once.iter().map(|p| (*p).clone()).collect();
        let twice = filter_politicians(&kept, &state, &coalitions);
        prop_assert_eq!(names(&once), names(&twice));
    }

    #[test]
    fn precomputed_and_live_stats_agree(
        politicians in arb_politicians(),
        state in arb_state(),
    ) {
        let live = dashboard(politicians.clone(), false);
        let cached = dashboard(politicians, true);
        prop_assert_eq!(live.stats(&state), cached.stats(&state));
    }
}

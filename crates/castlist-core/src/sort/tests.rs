use super::*;
use crate::{
    ids::SeasonId,
    model::{placement::PlacementNamespace, roster::RosterKind},
    store::MemoryProfiles,
    test_fixtures::{at, member, native_roster},
};
use proptest::prelude::*;
use std::{collections::BTreeSet, num::NonZeroU32};

fn names(sorted: &SortedMembers) -> Vec<&str> {
    sorted
        .members
        .iter()
        .map(|ordered| ordered.member.display_name.as_str())
        .collect()
}

fn prefixes(sorted: &SortedMembers) -> Vec<Option<&str>> {
    sorted
        .members
        .iter()
        .map(|ordered| ordered.prefix.as_deref())
        .collect()
}

fn rank(n: u32) -> NonZeroU32 {
    NonZeroU32::new(n).expect("fixture rank is positive")
}

fn roster_with(strategy: SortStrategy) -> RosterEntity {
    let mut roster = native_roster("castlist_a", "Alpha");
    roster.settings.sort_strategy = Some(strategy);
    roster
}

fn sorted(members: &[Member], roster: &RosterEntity, ctx: &SortContext<'_>) -> SortedMembers {
    sort_members(members, roster, None, ctx).expect("sort should succeed")
}

#[test]
fn alphabetical_is_case_insensitive_with_id_tie_break() {
    let members = [
        member("m3", "bravo"),
        member("m2", "Alpha"),
        member("m1", "alpha"),
        member("m4", "Charlie"),
    ];

    let result = sorted(&members, &roster_with(SortStrategy::Alphabetical), &SortContext::new());

    assert_eq!(names(&result), ["alpha", "Alpha", "bravo", "Charlie"]);
    assert_eq!(result.members[0].id().as_str(), "m1");
    assert!(!result.fell_back());
}

#[test]
fn reverse_alphabetical_keeps_ascending_id_for_ties() {
    let members = [member("m2", "Echo"), member("m1", "echo"), member("m3", "Delta")];

    let result = sorted(
        &members,
        &roster_with(SortStrategy::ReverseAlphabetical),
        &SortContext::new(),
    );

    let ids: Vec<_> = result.members.iter().map(|m| m.id().as_str()).collect();
    assert_eq!(ids, ["m1", "m2", "m3"]);
}

#[test]
fn ranked_puts_placements_first_with_prefixes() {
    let mut roster = roster_with(SortStrategy::Ranked);
    roster.season_id = Some(SeasonId::new("S1"));
    let mut table = PlacementTable::default();
    table.insert(PlacementNamespace::for_season(Some(&SeasonId::new("S1"))), "a".into(), rank(2));
    table.insert(PlacementNamespace::for_season(Some(&SeasonId::new("S1"))), "b".into(), rank(1));

    let members = [member("c", "C"), member("a", "A"), member("b", "B")];
    let result = sorted(&members, &roster, &SortContext::new().with_placements(&table));

    assert_eq!(names(&result), ["B", "A", "C"]);
    assert_eq!(prefixes(&result), [Some("1) "), Some("2) "), None]);
    assert_eq!(result.members[0].label(), "1) B");
}

#[test]
fn ranked_reads_only_the_roster_namespace() {
    // Global placements must not leak into a season-linked roster.
    let mut roster = roster_with(SortStrategy::Ranked);
    roster.season_id = Some(SeasonId::new("S2"));
    let mut table = PlacementTable::default();
    table.insert(PlacementNamespace::Global, "z".into(), rank(1));

    let members = [member("z", "Zed"), member("a", "Amy")];
    let result = sorted(&members, &roster, &SortContext::new().with_placements(&table));

    assert_eq!(names(&result), ["Amy", "Zed"]);
    assert_eq!(prefixes(&result), [None, None]);
}

#[test]
fn ranked_roster_type_ranks_without_explicit_setting() {
    let mut roster = native_roster("castlist_a", "Alpha");
    roster.kind = RosterKind::Ranked;
    let mut table = PlacementTable::default();
    table.insert(PlacementNamespace::Global, "z".into(), rank(1));

    let members = [member("a", "Alice"), member("z", "Zed")];
    let result = sorted(&members, &roster, &SortContext::new().with_placements(&table));

    assert_eq!(result.applied, SortStrategy::Ranked);
    let labels: Vec<_> = result.members.iter().map(OrderedMember::label).collect();
    assert_eq!(labels, ["1) Zed", "Alice"]);
}

#[test]
fn group_override_beats_roster_setting() {
    let roster = roster_with(SortStrategy::Alphabetical);
    let members = [member("a", "Alpha"), member("b", "Bravo")];

    let result = sort_members(
        &members,
        &roster,
        Some(SortStrategy::ReverseAlphabetical),
        &SortContext::new(),
    )
    .expect("sort should succeed");

    assert_eq!(result.requested, SortStrategy::ReverseAlphabetical);
    assert_eq!(names(&result), ["Bravo", "Alpha"]);
}

#[test]
fn age_sorts_ascending_with_missing_last() {
    let profiles = MemoryProfiles::new()
        .with("old", Profile { age: Some(40), ..Profile::default() })
        .with("young", Profile { age: Some(19), ..Profile::default() })
        .with("blank", Profile::default());
    let members = [
        member("blank", "Blank"),
        member("none", "Aaron"),
        member("old", "Old"),
        member("young", "Young"),
    ];

    let result = sorted(
        &members,
        &roster_with(SortStrategy::Age),
        &SortContext::new().with_profiles(&profiles),
    );

    assert_eq!(names(&result), ["Young", "Old", "Aaron", "Blank"]);
}

#[test]
fn timezone_sorts_by_offset_with_unresolvable_last() {
    let zone = |label: &str| Profile {
        timezone: Some(label.to_string()),
        ..Profile::default()
    };
    let profiles = MemoryProfiles::new()
        .with("ny", zone("EST"))
        .with("ldn", zone("UTC"))
        .with("del", zone("UTC+5:30"))
        .with("mars", zone("Olympus Mons"));
    let members = [
        member("mars", "Mars"),
        member("del", "Delhi"),
        member("ldn", "London"),
        member("ny", "New York"),
    ];

    let result = sorted(
        &members,
        &roster_with(SortStrategy::Timezone),
        &SortContext::new().with_profiles(&profiles),
    );

    assert_eq!(names(&result), ["New York", "London", "Delhi", "Mars"]);
}

#[test]
fn join_date_sorts_oldest_first() {
    let joined = |secs| Profile {
        joined_at: Some(at(secs)),
        ..Profile::default()
    };
    let profiles = MemoryProfiles::new()
        .with("late", joined(2_000))
        .with("early", joined(1_000))
        .with("tie", joined(1_000));
    let members = [member("late", "Late"), member("tie", "Tie"), member("early", "Early")];

    let result = sorted(
        &members,
        &roster_with(SortStrategy::JoinDate),
        &SortContext::new().with_profiles(&profiles),
    );

    assert_eq!(names(&result), ["Early", "Tie", "Late"]);
}

#[test]
fn custom_order_appends_unlisted_members_alphabetically() {
    let order = [MemberId::new("c"), MemberId::new("a"), MemberId::new("c")];
    let members = [
        member("a", "Alpha"),
        member("b", "Zulu"),
        member("c", "Charlie"),
        member("d", "Bravo"),
    ];

    let result = sorted(
        &members,
        &roster_with(SortStrategy::Custom),
        &SortContext::new().with_custom_order(&order),
    );

    assert_eq!(names(&result), ["Charlie", "Alpha", "Bravo", "Zulu"]);
}

#[test]
fn offline_profiles_fall_back_to_alphabetical_for_whole_list() {
    let profiles = MemoryProfiles::new().with("b", Profile { age: Some(1), ..Profile::default() });
    profiles.set_offline(true);
    let members = [member("b", "Bravo"), member("a", "Alpha")];

    let result = sorted(
        &members,
        &roster_with(SortStrategy::Age),
        &SortContext::new().with_profiles(&profiles),
    );

    assert!(result.fell_back());
    assert_eq!(result.requested, SortStrategy::Age);
    assert_eq!(result.applied, SortStrategy::Alphabetical);
    assert_eq!(names(&result), ["Alpha", "Bravo"]);
}

#[test]
fn missing_placement_data_falls_back_without_prefixes() {
    let members = [member("b", "Bravo"), member("a", "Alpha")];

    let result = sorted(&members, &roster_with(SortStrategy::Ranked), &SortContext::new());

    assert_eq!(result.applied, SortStrategy::Alphabetical);
    assert_eq!(prefixes(&result), [None, None]);
}

#[test]
fn member_without_id_is_malformed() {
    let members = [member("a", "Alpha"), member("  ", "Ghost")];

    let err = sort_members(
        &members,
        &roster_with(SortStrategy::Alphabetical),
        None,
        &SortContext::new(),
    )
    .expect_err("blank id must fail");

    let SortError::MalformedRecord(record) = err;
    assert_eq!(record.kind, RecordKind::Member);
    assert_eq!(record.key, "Ghost");
}

#[test]
fn empty_member_list_sorts_to_empty() {
    for strategy in SortStrategy::ALL {
        let result = sorted(&[], &roster_with(strategy), &SortContext::new());
        assert!(result.members.is_empty());
    }
}

///
/// PROPERTIES
///

fn arb_members() -> impl Strategy<Value = Vec<Member>> {
    prop::collection::btree_set("[a-z0-9]{1,6}", 0..24).prop_flat_map(|ids| {
        let ids: Vec<String> = ids.into_iter().collect();
        let len = ids.len();
        (
            Just(ids),
            prop::collection::vec("[A-Za-z ]{0,8}", len),
        )
            .prop_map(|(ids, names)| {
                ids.into_iter()
                    .zip(names)
                    .map(|(id, name)| Member::new(id, name))
                    .collect()
            })
    })
}

fn arb_profile() -> impl Strategy<Value = Profile> {
    (
        prop::option::of(0u32..120),
        prop::option::of(prop_oneof![
            Just("EST".to_string()),
            Just("UTC+5:30".to_string()),
            Just("nowhere".to_string()),
            Just("UTC+1é1".to_string()),
            "[A-Z+:0-9-]{0,6}",
            "(UTC)?[+-][0-9é東:+-]{0,4}",
        ]),
        prop::option::of((0i64..4_000_000_000).prop_map(at)),
    )
        .prop_map(|(age, timezone, joined_at)| Profile {
            age,
            timezone,
            joined_at,
        })
}

proptest! {
    #[test]
    fn every_strategy_is_a_permutation(
        members in arb_members(),
        strategy in prop::sample::select(SortStrategy::ALL.to_vec()),
        profiles in prop::collection::vec(arb_profile(), 24),
        ranks in prop::collection::vec(prop::option::of(1u32..5), 24),
    ) {
        let source = members
            .iter()
            .zip(&profiles)
            .fold(MemoryProfiles::new(), |acc, (member, profile)| {
                acc.with(member.id.clone(), profile.clone())
            });
        let mut table = PlacementTable::default();
        for (member, rank) in members.iter().zip(&ranks) {
            if let Some(rank) = rank.and_then(NonZeroU32::new) {
                table.insert(PlacementNamespace::Global, member.id.clone(), rank);
            }
        }
        let order: Vec<MemberId> = members.iter().rev().step_by(2).map(|m| m.id.clone()).collect();
        let ctx = SortContext::new()
            .with_placements(&table)
            .with_profiles(&source)
            .with_custom_order(&order);

        let result = sort_members(&members, &roster_with(strategy), None, &ctx)
            .expect("sorting valid members never fails");

        prop_assert_eq!(result.members.len(), members.len());
        let input: BTreeSet<_> = members.iter().map(|m| &m.id).collect();
        let output: BTreeSet<_> = result.members.iter().map(OrderedMember::id).collect();
        prop_assert_eq!(input, output);
        prop_assert_eq!(result.applied, strategy);
    }

    #[test]
    fn sorting_is_deterministic_under_input_rotation(
        members in arb_members(),
        shift in 0usize..24,
        strategy in prop::sample::select(vec![
            SortStrategy::Alphabetical,
            SortStrategy::ReverseAlphabetical,
            SortStrategy::Custom,
        ]),
    ) {
        let mut rotated = members.clone();
        if !rotated.is_empty() {
            let len = rotated.len();
            rotated.rotate_left(shift % len);
        }
        let roster = roster_with(strategy);

        let left = sort_members(&members, &roster, None, &SortContext::new()).expect("sorts");
        let right = sort_members(&rotated, &roster, None, &SortContext::new()).expect("sorts");

        prop_assert_eq!(left.members, right.members);
    }
}

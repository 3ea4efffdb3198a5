//! Module: view
//! Responsibility: the page payload handed to the presentation layer.
//! Does not own: rendering text, resolving rosters, or sorting.

use crate::{
    ids::{GroupId, RosterId},
    model::{
        member::OrderedMember,
        roster::RosterEntity,
        settings::{RosterSettings, SortStrategy},
    },
    nav::{NavAction, NavCodec, NavError, NavState},
    page::{Page, PageSection},
};
use serde::Serialize;

/// Apply a roster's display settings to one sorted group.
///
/// Returns the members to show and how many the `maxDisplay` cap withheld.
#[must_use]
pub fn apply_display(
    settings: &RosterSettings,
    mut members: Vec<OrderedMember>,
) -> (Vec<OrderedMember>, usize) {
    if !settings.show_rankings {
        for member in &mut members {
            member.prefix = None;
        }
    }

    let cap = settings
        .max_display
        .map_or(usize::MAX, |cap| usize::try_from(cap.get()).unwrap_or(usize::MAX));
    let hidden = members.len().saturating_sub(cap);
    members.truncate(cap);

    (members, hidden)
}

///
/// ViewSection
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSection {
    pub group_id: GroupId,
    pub strategy: SortStrategy,
    pub members: Vec<OrderedMember>,
    pub hidden: usize,
    pub continued: bool,
}

impl From<PageSection> for ViewSection {
    fn from(section: PageSection) -> Self {
        Self {
            group_id: section.group_id,
            strategy: section.strategy,
            members: section.members,
            hidden: section.hidden,
            continued: section.continued,
        }
    }
}

///
/// CastlistView
///
/// One page of one roster. An empty roster is a single page with no
/// sections and `total_pages == 0`. Navigation tokens are present only
/// when there is somewhere else to go.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CastlistView {
    pub roster: RosterEntity,
    pub page_index: u32,
    pub total_pages: u32,
    pub sections: Vec<ViewSection>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev_token: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

impl CastlistView {
    /// Select `page_index` out of `pages` and mint neighbour tokens.
    ///
    /// An out-of-range index is clamped to the last page.
    pub fn build(
        roster: &RosterEntity,
        mut pages: Vec<Page>,
        page_index: u32,
        codec: &NavCodec,
    ) -> Result<Self, NavError> {
        let total_pages = u32::try_from(pages.len())
            .map_err(|_| NavError::InvalidState(format!("{} pages overflow u32", pages.len())))?;
        let state = if total_pages == 0 {
            NavState::first(roster.id.clone(), 0)
        } else {
            NavState::new(roster.id.clone(), page_index.min(total_pages - 1), total_pages)?
        };

        let sections = match usize::try_from(state.page_index()) {
            Ok(index) if index < pages.len() => std::mem::take(&mut pages[index])
                .sections
                .into_iter()
                .map(ViewSection::from)
                .collect(),
            _ => Vec::new(),
        };

        let (prev_token, next_token) = if total_pages > 1 {
            (
                Some(codec.encode(&state.step(NavAction::Previous))?),
                Some(codec.encode(&state.step(NavAction::Next))?),
            )
        } else {
            (None, None)
        };

        Ok(Self {
            roster: roster.clone(),
            page_index: state.page_index(),
            total_pages,
            sections,
            prev_token,
            next_token,
        })
    }

    #[must_use]
    pub const fn roster_id(&self) -> &RosterId {
        &self.roster.id
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total_pages == 0
    }

    /// Display lines in order, as the presentation layer would print them.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.sections
            .iter()
            .flat_map(|section| section.members.iter().map(OrderedMember::label))
            .collect()
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        page::{Section, paginate},
        test_fixtures::{member, native_roster},
    };
    use std::num::NonZeroU32;

    fn ranked(n: usize) -> Vec<OrderedMember> {
        (1..=n)
            .map(|rank| OrderedMember {
                member: member(&format!("m{rank}"), &format!("Member {rank}")),
                prefix: Some(format!("{rank}) ")),
            })
            .collect()
    }

    fn pages(members_per_section: &[usize], per_page: u32) -> Vec<Page> {
        let sections = members_per_section
            .iter()
            .enumerate()
            .map(|(index, count)| Section {
                group_id: GroupId::new(format!("g{index}")),
                strategy: SortStrategy::Alphabetical,
                members: ranked(*count),
                hidden: 0,
            })
            .collect();

        paginate(sections, per_page)
    }

    #[test]
    fn hidden_rankings_strip_prefixes() {
        let settings = RosterSettings {
            show_rankings: false,
            ..RosterSettings::default()
        };

        let (shown, hidden) = apply_display(&settings, ranked(3));

        assert_eq!(hidden, 0);
        assert!(shown.iter().all(|member| member.prefix.is_none()));
    }

    #[test]
    fn max_display_truncates_and_counts_hidden() {
        let settings = RosterSettings {
            max_display: NonZeroU32::new(2),
            ..RosterSettings::default()
        };

        let (shown, hidden) = apply_display(&settings, ranked(5));

        assert_eq!(shown.len(), 2);
        assert_eq!(hidden, 3);
        assert_eq!(shown[1].label(), "2) Member 2");
    }

    #[test]
    fn empty_roster_view_has_no_tokens() {
        let roster = native_roster("castlist_a", "Alpha");

        let view =
            CastlistView::build(&roster, Vec::new(), 3, &NavCodec::default()).expect("builds");

        assert!(view.is_empty());
        assert_eq!(view.page_index, 0);
        assert!(view.sections.is_empty());
        assert!(view.prev_token.is_none() && view.next_token.is_none());
    }

    #[test]
    fn single_page_view_has_no_tokens() {
        let roster = native_roster("castlist_a", "Alpha");

        let codec = NavCodec::default();

        let view = CastlistView::build(&roster, pages(&[3], 10), 0, &codec).expect("builds");

        assert_eq!(view.total_pages, 1);
        assert_eq!(view.labels().len(), 3);
        assert!(view.next_token.is_none());
    }

    #[test]
    fn multi_page_view_tokens_wrap() {
        let roster = native_roster("castlist_a", "Alpha");
        let codec = NavCodec::default();

        let view = CastlistView::build(&roster, pages(&[4, 4, 4], 4), 2, &codec).expect("builds");
        let next = codec
            .decode(view.next_token.as_deref().expect("next token"))
            .expect("decodes");
        let prev = codec
            .decode(view.prev_token.as_deref().expect("prev token"))
            .expect("decodes");

        assert_eq!(view.total_pages, 3);
        assert_eq!(view.sections[0].group_id, GroupId::new("g2"));
        assert_eq!(next.page_index(), 0);
        assert_eq!(prev.page_index(), 1);
        assert_eq!(next.roster_id(), view.roster_id());
    }

    #[test]
    fn out_of_range_page_is_clamped() {
        let roster = native_roster("castlist_a", "Alpha");

        let codec = NavCodec::default();

        let view = CastlistView::build(&roster, pages(&[4, 4], 4), 9, &codec).expect("builds");

        assert_eq!(view.page_index, 1);
    }
}

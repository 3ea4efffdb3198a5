//! Module: page
//! Responsibility: pack sorted group sections into fixed-size pages.
//! Does not own: sorting, display settings, or navigation tokens.

use crate::{
    ids::GroupId,
    model::{member::OrderedMember, settings::SortStrategy},
};

///
/// Section
/// One group's members in display order, ready for pagination.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Section {
    pub group_id: GroupId,
    pub strategy: SortStrategy,
    pub members: Vec<OrderedMember>,

    /// Members withheld by a display cap; never paginated.
    pub hidden: usize,
}

///
/// PageSection
///
/// The part of a section that landed on one page. `continued` marks a
/// slice that picks up where the previous page left off.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PageSection {
    pub group_id: GroupId,
    pub strategy: SortStrategy,
    pub members: Vec<OrderedMember>,
    pub hidden: usize,
    pub continued: bool,
}

///
/// Page
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Page {
    pub sections: Vec<PageSection>,
}

impl Page {
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.sections.iter().map(|section| section.members.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Pack sections into pages of at most `members_per_page` members.
///
/// Sections with no members are dropped. A section that fits on one page is
/// never split; it moves to a fresh page instead. A section larger than a
/// page starts on a fresh page and spans consecutive pages. No sections
/// means no pages.
#[must_use]
pub fn paginate(sections: Vec<Section>, members_per_page: u32) -> Vec<Page> {
    let capacity = usize::try_from(members_per_page).unwrap_or(usize::MAX).max(1);
    let mut packer = Packer::new(capacity);

    for section in sections {
        if section.members.is_empty() {
            continue;
        }
        packer.push(section);
    }

    packer.finish()
}

// Greedy page filler.
struct Packer {
    capacity: usize,
    pages: Vec<Page>,
    current: Page,
    used: usize,
}

impl Packer {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            pages: Vec::new(),
            current: Page::default(),
            used: 0,
        }
    }

    fn push(&mut self, section: Section) {
        let len = section.members.len();
        if self.used + len > self.capacity {
            self.flush();
        }

        if len <= self.capacity {
            self.place(section.group_id, section.strategy, section.members, section.hidden, false);
            return;
        }

        let chunks: Vec<Vec<OrderedMember>> = section
            .members
            .chunks(self.capacity)
            .map(<[OrderedMember]>::to_vec)
            .collect();
        let last = chunks.len() - 1;

        for (index, chunk) in chunks.into_iter().enumerate() {
            self.flush();
            // The hidden count rides on the final slice.
            let hidden = if index == last { section.hidden } else { 0 };
            self.place(section.group_id.clone(), section.strategy, chunk, hidden, index > 0);
        }
    }

    fn place(
        &mut self,
        group_id: GroupId,
        strategy: SortStrategy,
        members: Vec<OrderedMember>,
        hidden: usize,
        continued: bool,
    ) {
        self.used += members.len();
        self.current.sections.push(PageSection {
            group_id,
            strategy,
            members,
            hidden,
            continued,
        });
    }

    fn flush(&mut self) {
        if !self.current.is_empty() {
            self.pages.push(std::mem::take(&mut self.current));
            self.used = 0;
        }
    }

    fn finish(mut self) -> Vec<Page> {
        self.flush();
        self.pages
    }
}

///
/// TESTS
///

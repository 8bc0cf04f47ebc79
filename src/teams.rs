//! Team batches, senior quotes and the teams page.

use crate::dom::{Container, stagger_delay};
use crate::routing::{batch_anchor, batch_link};
use crate::source::{self, ResourceSource, fetch_json};
use crate::types::{Batch, Member, MembersDocument, Quote, SocialLinks, TeamRoster};
use maud::{Markup, html};
use tracing::warn;

const BATCH_STAGGER_MS: u64 = 100;
const MEMBER_STAGGER_MS: u64 = 20;

/// First letters of the first two words, uppercased.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct TeamsManager {
    roster: Option<TeamRoster>,
}

impl TeamsManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, source: &dyn ResourceSource) -> Option<&TeamRoster> {
        match fetch_json::<MembersDocument>(source, source::MEMBERS) {
            Ok(doc) => self.roster = Some(doc.team_members),
            Err(e) => {
                warn!(error = %e, "failed to load team members");
                self.roster = None;
            }
        }
        self.roster.as_ref()
    }

    pub fn roster(&self) -> Option<&TeamRoster> {
        self.roster.as_ref()
    }

    pub fn find_batch(&self, year: &str) -> Option<&Batch> {
        self.roster()?.batches.iter().find(|b| b.year == year)
    }

    /// Home page batch cards, each linking to its teams page section.
    pub fn render_batches(&self, container: &mut Container) {
        let Some(roster) = self.roster() else { return };
        container.clear();
        for (i, batch) in roster.batches.iter().enumerate() {
            container.append(batch_card(batch, i));
        }
    }

    /// Quote stack with the first quote active.
    pub fn render_quotes(&self, container: &mut Container) {
        let Some(roster) = self.roster() else { return };
        container.clear();
        for (i, quote) in roster.quotes.iter().enumerate() {
            container.append(quote_card(quote, i));
        }
    }

    /// Teams page: a jump nav and one section per batch.
    ///
    /// `selected` is the deep-linked batch year, if any; its section and nav
    /// dot are marked active.
    pub fn render_team_sections(&self, container: &mut Container, selected: Option<&str>) {
        let Some(roster) = self.roster() else { return };
        container.clear();
        let selected = selected.filter(|year| roster.batches.iter().any(|b| b.year == *year));
        if let Some(year) = selected {
            container.set_attr("data-selected-batch", year);
        }
        container.append(batch_nav(&roster.batches, selected));
        for batch in &roster.batches {
            container.append(batch_section(batch, selected == Some(batch.year.as_str())));
        }
    }
}

fn batch_card(batch: &Batch, index: usize) -> Markup {
    html! {
        div.batch-card.glass-container
            data-aos="fade-up"
            data-aos-delay=(stagger_delay(index, BATCH_STAGGER_MS))
            data-batch=(batch.year)
        {
            div.batch-icon {
                i class=(batch.icon) {}
            }
            h3 { (batch.name) }
            a.batch-btn href=(batch_link(&batch.year)) { "View Team" }
        }
    }
}

fn quote_card(quote: &Quote, index: usize) -> Markup {
    html! {
        div.quote-card.active[index == 0] data-quote=(index) {
            div.quote-content {
                i.fas.fa-quote-left.quote-icon {}
                p { "\"" (quote.text) "\"" }
                span.quote-author { "- " (quote.author) }
            }
        }
    }
}

fn batch_nav(batches: &[Batch], selected: Option<&str>) -> Markup {
    html! {
        nav.batch-nav {
            @for (i, batch) in batches.iter().enumerate() {
                @let active = match selected {
                    Some(year) => year == batch.year,
                    None => i == 0,
                };
                a.nav-dot.active[active]
                    href={ "#" (batch_anchor(&batch.year)) }
                    data-batch=(batch.year)
                {
                    span.nav-label { (batch.year) }
                }
            }
        }
    }
}

fn batch_section(batch: &Batch, selected: bool) -> Markup {
    html! {
        section.batch-section.active[selected] id=(batch_anchor(&batch.year)) {
            div.batch-header {
                i class=(batch.icon) {}
                h2 { (batch.name) }
            }
            div.members-grid id={ "members-" (batch.year) } {
                @if batch.members.is_empty() {
                    div.no-members {
                        i.fas.fa-users {}
                        p { "No members found for batch " (batch.year) }
                    }
                } @else {
                    @for (i, member) in batch.members.iter().enumerate() {
                        (member_card(member, i))
                    }
                }
            }
        }
    }
}

fn member_card(member: &Member, index: usize) -> Markup {
    let initials = initials(&member.name);
    html! {
        div.member-card
            data-aos="fade-up"
            data-aos-delay=(stagger_delay(index, MEMBER_STAGGER_MS))
        {
            div.member-avatar {
                @if let Some(photo) = &member.photo {
                    img src=(photo) alt=(member.name)
                        onerror="this.style.display='none'; \
                                 this.nextElementSibling.style.display='flex'";
                    span.initials style="display:none" { (initials) }
                } @else {
                    span.initials { (initials) }
                }
            }
            h3.member-name { (member.name) }
            @if let Some(social) = &member.social {
                (social_links(social))
            }
        }
    }
}

fn social_links(social: &SocialLinks) -> Markup {
    let links = [
        (&social.linkedin, "LinkedIn", "fab fa-linkedin"),
        (&social.github, "GitHub", "fab fa-github"),
        (&social.instagram, "Instagram", "fab fa-instagram"),
        (&social.twitter, "Twitter", "fab fa-twitter"),
    ];
    html! {
        div.member-social {
            @for (url, title, icon) in links {
                @if let Some(url) = url {
                    a href=(url) target="_blank" rel="noopener" title=(title) {
                        i class=(icon) {}
                    }
                }
            }
            @if let Some(email) = &social.email {
                a href={ "mailto:" (email) } title="Email" {
                    i.fas.fa-envelope {}
                }
            }
        }
    }
}

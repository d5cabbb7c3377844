use super::{
    normalize::normalize,
    row::{ClaimRow, Status},
    stats::Stats,
    store::SheetStore,
};
use crate::error::{Error, Precondition, Result as DomainResult};
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use serenity::all::UserId;

/// Event-wide settings shown alongside the sheet
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct EventInfo {
    pub topic: String,
    pub deadline: String,
    /// May contain `{CLAIM_MAX}` and `{UNAPP_MAX}` placeholders
    pub rules: String,
    /// Maximum claimed but unfinished Pokemon per participant
    pub claim_max: usize,
    /// Maximum submitted but unapproved Pokemon per participant
    pub unapproved_max: usize,
}

impl Default for EventInfo {
    fn default() -> Self {
        Self {
            topic: String::new(),
            deadline: String::new(),
            rules: String::new(),
            claim_max: 10,
            unapproved_max: 5,
        }
    }
}

impl EventInfo {
    pub fn formatted_rules(&self) -> String {
        self.rules
            .replace("{CLAIM_MAX}", &self.claim_max.to_string())
            .replace("{UNAPP_MAX}", &self.unapproved_max.to_string())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetData {
    #[serde(default)]
    pub event: EventInfo,
    #[serde(default)]
    pub rows: Vec<ClaimRow>,
}

/// Local copy of the claim sheet.  Reads are served from the copy; `refresh` pulls the
/// authoritative data again and `update_row` writes one row back.
pub struct Sheet {
    data: SheetData,
    store: Box<dyn SheetStore>,
}

impl Sheet {
    pub async fn load(store: Box<dyn SheetStore>) -> Result<Self> {
        let data = store.load().await?;
        Ok(Self { data, store })
    }

    pub async fn refresh(&mut self) -> Result<()> {
        self.data = self.store.load().await?;
        Ok(())
    }

    pub fn event(&self) -> &EventInfo {
        &self.data.event
    }

    pub fn rows(&self) -> &[ClaimRow] {
        &self.data.rows
    }

    /// Look up a row by canonical or alternative name, ignoring case and accents.
    pub fn row(&self, key: &str) -> DomainResult<ClaimRow> {
        let key_norm = normalize(key);
        if key_norm.is_empty() {
            return Err(Error::InvalidItem(key.to_owned()));
        }

        self.data
            .rows
            .iter()
            .find(|row| {
                normalize(&row.pokemon) == key_norm
                    || row.alt_names.iter().any(|alt| normalize(alt) == key_norm)
            })
            .cloned()
            .ok_or_else(|| Error::InvalidItem(key.to_owned()))
    }

    pub fn row_by_dex(&self, dex: u32) -> Option<ClaimRow> {
        self.data.rows.iter().find(|row| row.dex == dex).cloned()
    }

    /// Replace the row with the same dex number, then persist.
    pub async fn update_row(&mut self, row: &ClaimRow) -> Result<()> {
        let slot = self
            .data
            .rows
            .iter_mut()
            .find(|r| r.dex == row.dex)
            .ok_or_else(|| anyhow!("No row with dex #{} on the sheet", row.dex))?;
        *slot = row.clone();
        self.store.save(&self.data).await
    }

    pub fn rows_of(&self, user: UserId) -> Vec<&ClaimRow> {
        self.data
            .rows
            .iter()
            .filter(|row| row.is_claimed_by(user))
            .collect()
    }

    /// Whether `user` is below the unfinished-claim limit
    pub fn can_claim(&self, user: UserId) -> bool {
        let unfinished = self
            .rows_of(user)
            .into_iter()
            .filter(|row| row.status() != Status::Completed)
            .count();
        unfinished < self.data.event.claim_max
    }

    pub fn check_claim_limit(&self, user: UserId) -> DomainResult<()> {
        if self.can_claim(user) {
            Ok(())
        } else {
            Err(Error::PreconditionFailed(Precondition::ClaimLimitReached(
                self.data.event.claim_max,
            )))
        }
    }

    pub fn stats(&self) -> Stats {
        Stats::from_rows(&self.data.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::afd::{row::Participant, store::MemoryStore};

    fn sample() -> SheetData {
        let mut flabebe = ClaimRow::new(669, "Flabébé");
        flabebe.alt_names.push("Flower Fairy".to_owned());
        SheetData {
            event: EventInfo {
                claim_max: 2,
                ..Default::default()
            },
            rows: vec![
                ClaimRow::new(133, "Eevee"),
                ClaimRow::new(25, "Pikachu"),
                ClaimRow::new(1, "Bulbasaur"),
                flabebe,
            ],
        }
    }

    fn user(id: u64) -> Participant {
        Participant {
            id: UserId::new(id),
            name: format!("user{}", id),
        }
    }

    #[tokio::test]
    async fn lookup_normalizes_names() {
        let sheet = Sheet::load(Box::new(MemoryStore::new(sample()))).await.unwrap();
        assert_eq!(sheet.row("eevee").unwrap().dex, 133);
        assert_eq!(sheet.row("FLABEBE").unwrap().dex, 669);
        assert_eq!(sheet.row("flower fairy").unwrap().dex, 669);
        assert_eq!(
            sheet.row("Agumon"),
            Err(Error::InvalidItem("Agumon".to_owned()))
        );
        assert!(sheet.row("   ").is_err());
    }

    #[tokio::test]
    async fn update_row_persists_and_refresh_sees_other_writers() {
        let store = MemoryStore::new(sample());
        let shared = store.shared();
        let mut sheet = Sheet::load(Box::new(store)).await.unwrap();

        let mut row = sheet.row("Eevee").unwrap();
        row.claim(&user(1)).unwrap();
        sheet.update_row(&row).await.unwrap();
        assert!(shared.lock().await.rows[0].is_claimed_by(UserId::new(1)));

        // Someone else writes behind our back
        shared.lock().await.rows[1].owner = Some(user(2));
        assert!(sheet.row("Pikachu").unwrap().owner.is_none());
        sheet.refresh().await.unwrap();
        assert!(sheet.row("Pikachu").unwrap().is_claimed_by(UserId::new(2)));
    }

    #[tokio::test]
    async fn update_of_unknown_row_fails() {
        let mut sheet = Sheet::load(Box::new(MemoryStore::new(sample()))).await.unwrap();
        assert!(sheet.update_row(&ClaimRow::new(9999, "Missingno")).await.is_err());
    }

    #[tokio::test]
    async fn claim_limit_counts_only_unfinished() {
        let mut sheet = Sheet::load(Box::new(MemoryStore::new(sample()))).await.unwrap();
        let a = user(1);
        assert!(sheet.can_claim(a.id));

        for name in ["Eevee", "Pikachu"] {
            let mut row = sheet.row(name).unwrap();
            row.claim(&a).unwrap();
            sheet.update_row(&row).await.unwrap();
        }
        assert!(!sheet.can_claim(a.id));
        assert_eq!(sheet.rows_of(a.id).len(), 2);

        let mut row = sheet.row("Eevee").unwrap();
        row.submit(a.id, "https://example.com/e.png").unwrap();
        row.approve(UserId::new(9)).unwrap();
        sheet.update_row(&row).await.unwrap();
        assert!(sheet.can_claim(a.id));
    }

    #[tokio::test]
    async fn claim_limit_holds_for_claims_confirmed_together() {
        let store = MemoryStore::new(SheetData {
            event: EventInfo {
                claim_max: 1,
                ..Default::default()
            },
            ..sample()
        });
        let mut sheet = Sheet::load(Box::new(store)).await.unwrap();
        let a = user(1);

        // Both claims pass the early check before either is written
        assert!(sheet.check_claim_limit(a.id).is_ok());
        let mut eevee = sheet.row("Eevee").unwrap();
        let mut pikachu = sheet.row("Pikachu").unwrap();

        eevee.claim(&a).unwrap();
        sheet.update_row(&eevee).await.unwrap();

        sheet.refresh().await.unwrap();
        assert_eq!(
            sheet.check_claim_limit(a.id),
            Err(Error::PreconditionFailed(Precondition::ClaimLimitReached(1)))
        );
        assert!(pikachu.claim(&a).is_ok());
        assert_eq!(sheet.row_by_dex(25).unwrap().owner, None);
        assert_eq!(sheet.row_by_dex(9999), None);
    }

    #[test]
    fn rules_placeholders_are_filled() {
        let event = EventInfo {
            rules: "Claim up to {CLAIM_MAX}, {UNAPP_MAX} unapproved".to_owned(),
            claim_max: 3,
            unapproved_max: 1,
            ..Default::default()
        };
        assert_eq!(event.formatted_rules(), "Claim up to 3, 1 unapproved");
    }
}

use crate::error::{Error, Precondition, Result, Unauthorized};
use serde::{Deserialize, Serialize};
use serenity::all::UserId;

/// Someone taking part in the event
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub id: UserId,
    pub name: String,
}

/// A reviewer's request for changes to a submission
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ReviewComment {
    pub by: UserId,
    pub text: String,
}

/// One Pokemon on the sheet and everything recorded about its drawing.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ClaimRow {
    pub dex: u32,
    pub pokemon: String,
    #[serde(default)]
    pub alt_names: Vec<String>,
    #[serde(default)]
    pub owner: Option<Participant>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub approved_by: Option<UserId>,
    #[serde(default)]
    pub comment: Option<ReviewComment>,
}

/// Where a row stands in the event.  Always derived from the row's fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Unclaimed,
    Claimed,
    /// Submitted, awaiting review
    Submitted,
    CorrectionPending,
    Completed,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(match self {
            Status::Unclaimed => "Not claimed.",
            Status::Claimed => "Claimed.",
            Status::Submitted => "Submitted, Awaiting review.",
            Status::CorrectionPending => "Correction pending.",
            Status::Completed => "Complete!",
        })
    }
}

impl ClaimRow {
    pub fn new(dex: u32, pokemon: impl Into<String>) -> Self {
        Self {
            dex,
            pokemon: pokemon.into(),
            alt_names: Vec::new(),
            owner: None,
            image: None,
            approved_by: None,
            comment: None,
        }
    }

    pub fn status(&self) -> Status {
        match (&self.owner, &self.image, &self.approved_by, &self.comment) {
            (None, _, _, _) => Status::Unclaimed,
            (Some(_), None, _, _) => Status::Claimed,
            (Some(_), Some(_), Some(_), _) => Status::Completed,
            (Some(_), Some(_), None, Some(_)) => Status::CorrectionPending,
            (Some(_), Some(_), None, None) => Status::Submitted,
        }
    }

    pub fn is_claimed_by(&self, user: UserId) -> bool {
        self.owner.as_ref().is_some_and(|owner| owner.id == user)
    }

    pub fn claim(&mut self, actor: &Participant) -> Result<()> {
        if let Some(owner) = &self.owner {
            return Err(Error::PreconditionFailed(Precondition::AlreadyClaimed {
                by_self: owner.id == actor.id,
                owner: owner.name.clone(),
            }));
        }

        self.owner = Some(actor.clone());
        Ok(())
    }

    /// Claim on someone's behalf, overriding any other claimer.  Overriding drops whatever the
    /// previous claimer submitted.
    pub fn force_claim(&mut self, user: &Participant) -> Result<()> {
        if let Some(owner) = &self.owner {
            if owner.id == user.id {
                return Err(Error::PreconditionFailed(Precondition::AlreadyClaimed {
                    by_self: true,
                    owner: owner.name.clone(),
                }));
            }
            self.reset();
        }

        self.owner = Some(user.clone());
        Ok(())
    }

    pub fn unclaim(&mut self, actor: UserId) -> Result<()> {
        self.check_owner(actor, Precondition::NotClaimed)?;
        self.reset();
        Ok(())
    }

    pub fn force_unclaim(&mut self) -> Result<()> {
        if self.owner.is_none() {
            return Err(Error::PreconditionFailed(Precondition::NotClaimed));
        }
        self.reset();
        Ok(())
    }

    /// Attach (or replace) the drawing.  Any earlier review no longer applies.
    pub fn submit(&mut self, actor: UserId, image: impl Into<String>) -> Result<()> {
        self.check_owner(actor, Precondition::NotClaimed)?;
        self.image = Some(image.into());
        self.approved_by = None;
        self.comment = None;
        Ok(())
    }

    pub fn unsubmit(&mut self, actor: UserId) -> Result<()> {
        if self.image.is_none() {
            return Err(Error::PreconditionFailed(Precondition::NotSubmitted));
        }
        self.check_owner(actor, Precondition::NotSubmitted)?;
        self.image = None;
        self.approved_by = None;
        self.comment = None;
        Ok(())
    }

    pub fn approve(&mut self, approver: UserId) -> Result<()> {
        self.check_reviewable()?;
        self.approved_by = Some(approver);
        self.comment = None;
        Ok(())
    }

    pub fn unapprove(&mut self) -> Result<()> {
        if self.approved_by.is_none() {
            return Err(Error::PreconditionFailed(Precondition::NotApproved));
        }
        self.approved_by = None;
        Ok(())
    }

    /// Ask the claimer for changes without approving.
    pub fn request_correction(&mut self, reviewer: UserId, text: impl Into<String>) -> Result<()> {
        self.check_reviewable()?;
        self.comment = Some(ReviewComment {
            by: reviewer,
            text: text.into(),
        });
        Ok(())
    }

    fn check_owner(&self, actor: UserId, missing: Precondition) -> Result<()> {
        match &self.owner {
            None => Err(Error::PreconditionFailed(missing)),
            Some(owner) if owner.id != actor => {
                Err(Error::Unauthorized(Unauthorized::NotOwner(owner.name.clone())))
            }
            Some(_) => Ok(()),
        }
    }

    fn check_reviewable(&self) -> Result<()> {
        match self.status() {
            Status::Unclaimed => Err(Error::PreconditionFailed(Precondition::NotClaimed)),
            Status::Claimed => Err(Error::PreconditionFailed(Precondition::NotSubmitted)),
            Status::Completed => Err(Error::PreconditionFailed(Precondition::AlreadyApproved)),
            Status::Submitted | Status::CorrectionPending => Ok(()),
        }
    }

    fn reset(&mut self) {
        self.owner = None;
        self.image = None;
        self.approved_by = None;
        self.comment = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: u64, name: &str) -> Participant {
        Participant {
            id: UserId::new(id),
            name: name.to_owned(),
        }
    }

    fn assert_invariants(row: &ClaimRow) {
        if row.owner.is_none() {
            assert!(row.image.is_none());
            assert!(row.approved_by.is_none());
            assert!(row.comment.is_none());
        }
        if row.comment.is_some() {
            assert!(row.approved_by.is_none());
        }
        if row.approved_by.is_some() {
            assert!(row.image.is_some());
        }
    }

    #[test]
    fn eevee_lifecycle() {
        let a = user(1, "userA");
        let admin = UserId::new(99);
        let mut row = ClaimRow::new(133, "Eevee");
        assert_eq!(row.status(), Status::Unclaimed);

        row.claim(&a).unwrap();
        assert_eq!(row.status(), Status::Claimed);
        assert!(row.is_claimed_by(a.id));

        row.submit(a.id, "https://example.com/url1.png").unwrap();
        assert_eq!(row.status(), Status::Submitted);

        row.approve(admin).unwrap();
        assert_eq!(row.status(), Status::Completed);
        assert_eq!(row.approved_by, Some(admin));

        row.submit(a.id, "https://example.com/url2.png").unwrap();
        assert_eq!(row.status(), Status::Submitted);
        assert_eq!(row.approved_by, None);
        assert_eq!(row.image.as_deref(), Some("https://example.com/url2.png"));
        assert_invariants(&row);
    }

    #[test]
    fn claim_then_unclaim_clears_everything() {
        let a = user(1, "userA");
        let mut row = ClaimRow::new(25, "Pikachu");
        row.claim(&a).unwrap();
        row.submit(a.id, "https://example.com/p.png").unwrap();
        row.request_correction(UserId::new(9), "more yellow").unwrap();
        row.unclaim(a.id).unwrap();
        assert_eq!(row, ClaimRow::new(25, "Pikachu"));
        assert_eq!(row.status(), Status::Unclaimed);
    }

    #[test]
    fn claim_reports_who_holds_it() {
        let a = user(1, "userA");
        let b = user(2, "userB");
        let mut row = ClaimRow::new(1, "Bulbasaur");
        row.claim(&a).unwrap();

        assert_eq!(
            row.claim(&a),
            Err(Error::PreconditionFailed(Precondition::AlreadyClaimed {
                by_self: true,
                owner: "userA".to_owned()
            }))
        );
        assert_eq!(
            row.claim(&b),
            Err(Error::PreconditionFailed(Precondition::AlreadyClaimed {
                by_self: false,
                owner: "userA".to_owned()
            }))
        );
        assert!(row.is_claimed_by(a.id));
    }

    #[test]
    fn only_the_claimer_may_unclaim_or_submit() {
        let a = user(1, "userA");
        let b = user(2, "userB");
        let mut row = ClaimRow::new(4, "Charmander");

        assert_eq!(
            row.unclaim(a.id),
            Err(Error::PreconditionFailed(Precondition::NotClaimed))
        );
        assert_eq!(
            row.submit(a.id, "x"),
            Err(Error::PreconditionFailed(Precondition::NotClaimed))
        );

        row.claim(&a).unwrap();
        assert_eq!(
            row.unclaim(b.id),
            Err(Error::Unauthorized(Unauthorized::NotOwner("userA".to_owned())))
        );
        assert_eq!(
            row.submit(b.id, "x"),
            Err(Error::Unauthorized(Unauthorized::NotOwner("userA".to_owned())))
        );
        assert!(row.image.is_none());
    }

    #[test]
    fn unsubmit_requires_an_image_of_your_own() {
        let a = user(1, "userA");
        let b = user(2, "userB");
        let mut row = ClaimRow::new(7, "Squirtle");
        row.claim(&a).unwrap();
        assert_eq!(
            row.unsubmit(a.id),
            Err(Error::PreconditionFailed(Precondition::NotSubmitted))
        );

        row.submit(a.id, "https://example.com/s.png").unwrap();
        row.approve(UserId::new(9)).unwrap();
        assert!(matches!(row.unsubmit(b.id), Err(Error::Unauthorized(_))));

        row.unsubmit(a.id).unwrap();
        assert_eq!(row.status(), Status::Claimed);
        assert_eq!(row.approved_by, None);
    }

    #[test]
    fn approval_requires_an_unapproved_submission() {
        let a = user(1, "userA");
        let admin = UserId::new(9);
        let mut row = ClaimRow::new(10, "Caterpie");
        assert_eq!(
            row.approve(admin),
            Err(Error::PreconditionFailed(Precondition::NotClaimed))
        );
        row.claim(&a).unwrap();
        assert_eq!(
            row.approve(admin),
            Err(Error::PreconditionFailed(Precondition::NotSubmitted))
        );
        row.submit(a.id, "https://example.com/c.png").unwrap();
        row.approve(admin).unwrap();
        assert_eq!(
            row.approve(admin),
            Err(Error::PreconditionFailed(Precondition::AlreadyApproved))
        );

        row.unapprove().unwrap();
        assert_eq!(row.status(), Status::Submitted);
        assert_eq!(
            row.unapprove(),
            Err(Error::PreconditionFailed(Precondition::NotApproved))
        );
    }

    #[test]
    fn correction_then_approval_clears_comment() {
        let a = user(1, "userA");
        let admin = UserId::new(9);
        let mut row = ClaimRow::new(39, "Jigglypuff");
        row.claim(&a).unwrap();
        row.submit(a.id, "https://example.com/j.png").unwrap();

        row.request_correction(admin, "outline is missing").unwrap();
        assert_eq!(row.status(), Status::CorrectionPending);
        assert_invariants(&row);

        row.approve(admin).unwrap();
        assert_eq!(row.status(), Status::Completed);
        assert!(row.comment.is_none());
        assert_eq!(
            row.request_correction(admin, "too late"),
            Err(Error::PreconditionFailed(Precondition::AlreadyApproved))
        );
    }

    #[test]
    fn force_claim_overrides_other_claimer() {
        let a = user(1, "userA");
        let b = user(2, "userB");
        let mut row = ClaimRow::new(150, "Mewtwo");
        row.claim(&a).unwrap();
        row.submit(a.id, "https://example.com/m.png").unwrap();

        row.force_claim(&b).unwrap();
        assert!(row.is_claimed_by(b.id));
        assert!(row.image.is_none());
        assert_eq!(row.status(), Status::Claimed);

        assert!(matches!(
            row.force_claim(&b),
            Err(Error::PreconditionFailed(Precondition::AlreadyClaimed { by_self: true, .. }))
        ));

        row.force_unclaim().unwrap();
        assert_eq!(row.status(), Status::Unclaimed);
        assert_eq!(
            row.force_unclaim(),
            Err(Error::PreconditionFailed(Precondition::NotClaimed))
        );
    }

    #[test]
    fn exactly_one_status_after_arbitrary_sequences() {
        let a = user(1, "userA");
        let b = user(2, "userB");
        let admin = UserId::new(9);
        let mut row = ClaimRow::new(143, "Snorlax");

        // Deterministic pseudo-random walk over every operation, valid or not.
        let mut seed: u32 = 12345;
        for _ in 0..2000 {
            seed = seed.wrapping_mul(1103515245).wrapping_add(12345);
            let _ = match (seed >> 16) % 10 {
                0 => row.claim(&a),
                1 => row.claim(&b),
                2 => row.unclaim(a.id),
                3 => row.submit(a.id, "https://example.com/a.png"),
                4 => row.submit(b.id, "https://example.com/b.png"),
                5 => row.unsubmit(a.id),
                6 => row.approve(admin),
                7 => row.unapprove(),
                8 => row.request_correction(admin, "fix"),
                _ => row.force_unclaim(),
            };
            assert_invariants(&row);
            let _ = row.status();
        }
    }
}

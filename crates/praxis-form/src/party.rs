//! Signing party resolution.
//!
//! Turns the v0 `required_parties` list into [`SigningParty`] rows and binds
//! each row to at most one signatory contact. Binding goes through the
//! signatory's `field` string: a contact whose field mentions the party name
//! belongs to that party.

use praxis_types::{
    LegacyPartyRequirement, LegacySignatory, PartyId, SignatoryAccount, SigningParty,
};

use crate::migrate::MigrationCx;
use crate::report::MigrationWarning;

/// Party synthesized when a v0 document declares no parties at all.
const DEFAULT_PARTY_NAME: &str = "student";

/// Resolve the declared parties, in signing order, with signatory accounts
/// bound where a contact matches.
///
/// An empty requirements list yields a single default party so that every
/// migrated document has someone to sign it. Each signatory binds to the
/// first party it matches; extra matches and orphaned contacts are kept out
/// of the output and reported as warnings.
pub(crate) fn resolve_parties(
    requirements: &[LegacyPartyRequirement],
    signatories: &[LegacySignatory],
    cx: &mut MigrationCx,
) -> Vec<SigningParty> {
    if requirements.is_empty() {
        let id = match cx.options.party_mapping.get(DEFAULT_PARTY_NAME) {
            Some(mapped) => PartyId::new(mapped.as_str()),
            None => PartyId::new("party-student"),
        };
        cx.register_party(DEFAULT_PARTY_NAME, id.clone());
        return vec![SigningParty::new(id, 1)];
    }

    // Signing order decides the index-strategy rank, not input position.
    let mut ordered: Vec<&LegacyPartyRequirement> = requirements.iter().collect();
    ordered.sort_by_key(|r| r.order);

    let mut matched = vec![false; signatories.len()];
    let mut parties = Vec::with_capacity(ordered.len());

    for (index, requirement) in ordered.iter().enumerate() {
        let id = cx.mint_party_id(&requirement.party, index);
        cx.register_party(&requirement.party, id.clone());
        let mut party = SigningParty::new(id, requirement.order);

        let hits: Vec<usize> = signatories
            .iter()
            .enumerate()
            .filter(|(_, s)| signatory_matches(&s.field, &requirement.party))
            .map(|(i, _)| i)
            .collect();

        if let Some((&first, rest)) = hits.split_first() {
            for &i in &hits {
                matched[i] = true;
            }
            let signatory = &signatories[first];
            let key = format!("signatory-{}", signatory.email);
            let account_id = cx.account_id(&key, &signatory.email);
            party.signatory_account = Some(SignatoryAccount {
                account_id,
                name: signatory.name.clone(),
                email: signatory.email.clone(),
                title: signatory.title.clone(),
                honorific: signatory.honorific.clone(),
            });
            if !rest.is_empty() {
                cx.warn(MigrationWarning::AmbiguousSignatory {
                    party: requirement.party.clone(),
                    kept: signatory.email.clone(),
                    ignored: rest.iter().map(|&i| signatories[i].email.clone()).collect(),
                });
            }
        }

        parties.push(party);
    }

    for (i, signatory) in signatories.iter().enumerate() {
        if !matched[i] {
            cx.warn(MigrationWarning::UnmatchedSignatory {
                field: signatory.field.clone(),
                email: signatory.email.clone(),
            });
        }
    }

    parties
}

/// Case-insensitive containment, the matching rule contacts were authored
/// against. `"Student.Signature"` matches party `"student"`.
fn signatory_matches(field: &str, party: &str) -> bool {
    // `contains("")` is always true; an unnamed party matches nothing.
    !party.is_empty()
        && field
            .to_ascii_lowercase()
            .contains(&party.to_ascii_lowercase())
}

/// Flatten a display name into an id-safe slug: alphanumeric runs,
/// lowercased, single-dash separated. `"Acme, Inc."` becomes `"acme-inc"`.
pub(crate) fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut gap = false;
    for c in name.chars() {
        if c.is_alphanumeric() {
            if gap && !out.is_empty() {
                out.push('-');
            }
            out.extend(c.to_lowercase());
            gap = false;
        } else {
            gap = true;
        }
    }
    out
}

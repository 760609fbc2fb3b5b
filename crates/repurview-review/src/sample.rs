//! Sample hypotheses, clinicians and a review queue used to seed a demo server.

use chrono::{DateTime, Duration, Utc};
use repurview_common::{
    Clinician, EvidenceSource, Hypothesis, HypothesisStatus, QuestionId, ReviewerId,
};
use tracing::debug;

use crate::requests::ReviewRequestManager;
use crate::store::HypothesisStore;

/// Pending requests on a fresh server: drug, disease, reviewer id, hours ago.
const SAMPLE_QUEUE: [(&str, &str, &str, i64); 3] = [
    ("Chloroquine", "Dengue", "1", 2),
    ("Metformin", "Dengue", "5", 5),
    ("Ivermectin", "Zika", "1", 24),
];

pub fn sample_hypotheses() -> Vec<Hypothesis> {
    use EvidenceSource::{Literature, Trial};
    use HypothesisStatus::{Awaiting, Concerns, Supported};

    vec![
        Hypothesis::new(
            "Chloroquine",
            "Dengue",
            Literature,
            78,
            "Endosomal pH modification inhibiting viral entry",
            12,
        )
        .with_status(Supported),
        Hypothesis::new(
            "Ivermectin",
            "Dengue",
            Trial,
            65,
            "Nuclear transport inhibition of viral proteins",
            8,
        )
        .with_status(Awaiting),
        Hypothesis::new(
            "Ribavirin",
            "Zika",
            Literature,
            42,
            "RNA-dependent RNA polymerase inhibition",
            5,
        )
        .with_status(Concerns),
        Hypothesis::new("Favipiravir", "Dengue", Trial, 71, "Viral RNA replication inhibition", 15)
            .with_status(Awaiting),
        Hypothesis::new(
            "Sofosbuvir",
            "Zika",
            Literature,
            58,
            "NS5B polymerase chain termination",
            9,
        )
        .with_status(Supported),
        Hypothesis::new(
            "Hydroxychloroquine",
            "Malaria",
            Trial,
            82,
            "Heme polymerase inhibition in parasites",
            24,
        )
        .with_status(Supported),
        Hypothesis::new(
            "Metformin",
            "Dengue",
            Literature,
            72,
            "AMPK activation limiting viral lipid metabolism",
            7,
        ),
        Hypothesis::new(
            "Ivermectin",
            "Zika",
            Trial,
            65,
            "Importin α/β blockade of NS5 nuclear import",
            6,
        ),
    ]
}

pub fn sample_clinicians() -> Vec<Clinician> {
    [
        ("1", "Dr. Sarah Chen", "Infectious Disease"),
        ("2", "Dr. James Okonkwo", "Tropical Medicine"),
        ("3", "Dr. Maria Santos", "Clinical Pharmacology"),
        ("4", "Dr. Raj Patel", "Internal Medicine"),
        ("5", "Dr. Michael Ross", "Emergency Medicine"),
    ]
    .into_iter()
    .map(|(id, name, specialty)| Clinician {
        id: ReviewerId::from(id),
        name: name.to_string(),
        specialty: specialty.to_string(),
    })
    .collect()
}

/// Insert the sample hypotheses into `store`, returning how many were added.
pub fn seed(store: &dyn HypothesisStore) -> repurview_common::Result<usize> {
    let hypotheses = sample_hypotheses();
    let count = hypotheses.len();
    for hypothesis in hypotheses {
        store.insert(hypothesis)?;
    }
    Ok(count)
}

/// Open the sample review queue, backdated from `now`, with every catalog
/// question selected. Entries whose hypothesis is absent are skipped.
pub fn seed_queue(
    store: &dyn HypothesisStore,
    requests: &ReviewRequestManager,
    now: DateTime<Utc>,
) -> repurview_common::Result<usize> {
    let questions: Vec<QuestionId> =
        requests.catalog().list().iter().map(|q| q.id.clone()).collect();
    let hypotheses = store.list();

    let mut opened = 0;
    for (drug, disease, reviewer, hours_ago) in SAMPLE_QUEUE {
        let Some(hypothesis) = hypotheses
            .iter()
            .find(|h| h.drug_name == drug && h.targets_disease(disease))
        else {
            debug!(drug, disease, "Sample review skipped: hypothesis not in store");
            continue;
        };
        let requested_at = now - Duration::hours(hours_ago);
        requests.open_at(hypothesis.id, reviewer, questions.clone(), requested_at)?;
        opened += 1;
    }
    Ok(opened)
}

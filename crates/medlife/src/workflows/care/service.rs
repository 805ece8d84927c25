use std::sync::Arc;

use chrono::NaiveDate;

use super::summary::{
    CareSummary, CareView, CircleMembers, InviteLink, PatientView, RECENT_RECORD_LIMIT,
};
use crate::config::LinkConfig;
use crate::workflows::journal::JournalRepository;
use crate::workflows::subjects::{RepositoryError, SubjectId, SubjectRecord, SubjectRepository};

/// Family circle and doctor access to a subject's journal.
pub struct CareService<S, J> {
    subjects: Arc<S>,
    journal: Arc<J>,
    links: LinkConfig,
}

impl<S, J> CareService<S, J>
where
    S: SubjectRepository + 'static,
    J: JournalRepository + 'static,
{
    pub fn new(subjects: Arc<S>, journal: Arc<J>, links: LinkConfig) -> Self {
        Self {
            subjects,
            journal,
            links,
        }
    }

    fn subject(&self, id: &SubjectId) -> Result<SubjectRecord, CareServiceError> {
        self.subjects
            .fetch(id)?
            .ok_or(CareServiceError::SubjectNotFound)
    }

    pub fn invite_link(&self, id: &SubjectId) -> Result<InviteLink, CareServiceError> {
        let subject = self.subject(id)?;
        Ok(InviteLink {
            invite_url: format!(
                "{}/register?invitedBy={}",
                self.links.frontend_url, subject.id.0
            ),
            subject_id: subject.id.0,
        })
    }

    /// Family list, then the subject's inviter, then everyone the subject invited.
    pub fn members(&self, id: &SubjectId, today: NaiveDate) -> Result<CircleMembers, CareServiceError> {
        let subject = self.subject(id)?;
        let mut members: Vec<SubjectRecord> = Vec::new();

        for member_id in &subject.family_members {
            if let Some(member) = self.subjects.fetch(member_id)? {
                push_unique(&mut members, member);
            }
        }
        if let Some(inviter_id) = &subject.invited_by {
            if let Some(inviter) = self.subjects.fetch(inviter_id)? {
                push_unique(&mut members, inviter);
            }
        }
        for invited in self.subjects.invited_by(&subject.id)? {
            push_unique(&mut members, invited);
        }

        let members: Vec<_> = members
            .iter()
            .map(|member| member.profile_view(today))
            .collect();
        Ok(CircleMembers {
            total: members.len(),
            members,
        })
    }

    /// Detail for a member of the caller's circle.
    pub fn member_detail(
        &self,
        id: &SubjectId,
        member_id: &SubjectId,
        today: NaiveDate,
    ) -> Result<CareView, CareServiceError> {
        let subject = self.subject(id)?;

        let in_family = subject.family_members.contains(member_id);
        let is_inviter = subject.invited_by.as_ref() == Some(member_id);
        let was_invited = !in_family
            && !is_inviter
            && self
                .subjects
                .fetch(member_id)?
                .is_some_and(|member| member.invited_by.as_ref() == Some(&subject.id));

        if !(in_family || is_inviter || was_invited) {
            return Err(CareServiceError::NotInCircle);
        }

        self.care_view(member_id, today)
    }

    /// Doctor-facing view; no relationship is required.
    pub fn patient_view(
        &self,
        patient_id: &SubjectId,
        today: NaiveDate,
    ) -> Result<PatientView, CareServiceError> {
        let view = self.care_view(patient_id, today)?;
        Ok(PatientView {
            patient_url: format!("{}/doctor/patient/{}", self.links.frontend_url, patient_id.0),
            view,
        })
    }

    fn care_view(&self, id: &SubjectId, today: NaiveDate) -> Result<CareView, CareServiceError> {
        let subject = self.subject(id)?;

        let mut glucose = self.journal.glucose_for(id)?;
        glucose.sort_by(|a, b| (b.date, b.time).cmp(&(a.date, a.time)));
        glucose.truncate(RECENT_RECORD_LIMIT);

        let mut activity = self.journal.activity_for(id)?;
        activity.sort_by(|a, b| b.date.cmp(&a.date));
        activity.truncate(RECENT_RECORD_LIMIT);

        let mut meals = self.journal.meals_for(id)?;
        meals.sort_by(|a, b| b.date.cmp(&a.date));
        meals.truncate(RECENT_RECORD_LIMIT);

        let medications: Vec<_> = self
            .journal
            .medications_for(id)?
            .into_iter()
            .filter(|medication| medication.active)
            .collect();

        let summary = CareSummary::from_records(&glucose, &activity, &meals, &medications);
        Ok(CareView {
            patient: subject.profile_view(today),
            glucose,
            activity,
            medications,
            meals,
            summary,
        })
    }
}

fn push_unique(members: &mut Vec<SubjectRecord>, record: SubjectRecord) {
    if !members.iter().any(|member| member.id == record.id) {
        members.push(record);
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CareServiceError {
    #[error("subject not found")]
    SubjectNotFound,
    #[error("subject is not part of the care circle")]
    NotInCircle,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

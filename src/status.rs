//! Canonical leave status set and the static approval transition table
use std::fmt;
use std::str::FromStr;

/// The four approver roles, in chain order.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ApproverRole {
    #[n(0)]
    Dic,
    #[n(1)]
    PjoSite,
    #[n(2)]
    ManagerHo,
    #[n(3)]
    HrHo,
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LeaveStatus {
    #[n(0)]
    PendingDic,
    #[n(1)]
    PendingPjo,
    #[n(2)]
    PendingManagerHo,
    #[n(3)]
    PendingHrHo,
    #[n(4)]
    Approved,
    #[n(5)]
    RejectedDic,
    #[n(6)]
    RejectedPjo,
    #[n(7)]
    RejectedManagerHo,
    #[n(8)]
    RejectedHrHo,
}

/// One row of the approval chain: who may act on `from`, and where each decision leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: LeaveStatus,
    pub approver: ApproverRole,
    pub on_approve: LeaveStatus,
    pub on_reject: LeaveStatus,
}

pub const TRANSITIONS: [Transition; 4] = [
    Transition {
        from: LeaveStatus::PendingDic,
        approver: ApproverRole::Dic,
        on_approve: LeaveStatus::PendingPjo,
        on_reject: LeaveStatus::RejectedDic,
    },
    Transition {
        from: LeaveStatus::PendingPjo,
        approver: ApproverRole::PjoSite,
        on_approve: LeaveStatus::PendingManagerHo,
        on_reject: LeaveStatus::RejectedPjo,
    },
    Transition {
        from: LeaveStatus::PendingManagerHo,
        approver: ApproverRole::ManagerHo,
        on_approve: LeaveStatus::PendingHrHo,
        on_reject: LeaveStatus::RejectedManagerHo,
    },
    Transition {
        from: LeaveStatus::PendingHrHo,
        approver: ApproverRole::HrHo,
        on_approve: LeaveStatus::Approved,
        on_reject: LeaveStatus::RejectedHrHo,
    },
];

impl ApproverRole {
    pub const ALL: [ApproverRole; 4] = [
        ApproverRole::Dic,
        ApproverRole::PjoSite,
        ApproverRole::ManagerHo,
        ApproverRole::HrHo,
    ];

    // short name used in status and display labels
    pub fn step_key(&self) -> &'static str {
        match self {
            ApproverRole::Dic => "dic",
            ApproverRole::PjoSite => "pjo",
            ApproverRole::ManagerHo => "manager_ho",
            ApproverRole::HrHo => "hr_ho",
        }
    }
}

impl LeaveStatus {
    pub const ALL: [LeaveStatus; 9] = [
        LeaveStatus::PendingDic,
        LeaveStatus::PendingPjo,
        LeaveStatus::PendingManagerHo,
        LeaveStatus::PendingHrHo,
        LeaveStatus::Approved,
        LeaveStatus::RejectedDic,
        LeaveStatus::RejectedPjo,
        LeaveStatus::RejectedManagerHo,
        LeaveStatus::RejectedHrHo,
    ];

    /// Status every new request starts in.
    pub const INITIAL: LeaveStatus = LeaveStatus::PendingDic;

    /// The chain row for this status, if it is a pending step.
    pub fn transition(&self) -> Option<&'static Transition> {
        TRANSITIONS.iter().find(|t| t.from == *self)
    }

    pub fn required_approver(&self) -> Option<ApproverRole> {
        self.transition().map(|t| t.approver)
    }

    pub fn is_pending(&self) -> bool {
        self.transition().is_some()
    }

    pub fn is_rejected(&self) -> bool {
        self.rejected_by().is_some()
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_pending()
    }

    pub fn rejected_by(&self) -> Option<ApproverRole> {
        TRANSITIONS
            .iter()
            .find(|t| t.on_reject == *self)
            .map(|t| t.approver)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveStatus::PendingDic => "pending_dic",
            LeaveStatus::PendingPjo => "pending_pjo",
            LeaveStatus::PendingManagerHo => "pending_manager_ho",
            LeaveStatus::PendingHrHo => "pending_hr_ho",
            LeaveStatus::Approved => "approved",
            LeaveStatus::RejectedDic => "rejected_dic",
            LeaveStatus::RejectedPjo => "rejected_pjo",
            LeaveStatus::RejectedManagerHo => "rejected_manager_ho",
            LeaveStatus::RejectedHrHo => "rejected_hr_ho",
        }
    }
}

impl fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeaveStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LeaveStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| format!("Invalid leave status: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_is_linear_and_ends_in_approved() {
        let mut status = LeaveStatus::INITIAL;
        let mut approvers = vec![];
        while let Some(step) = status.transition() {
            approvers.push(step.approver);
            status = step.on_approve;
        }
        assert_eq!(status, LeaveStatus::Approved);
        assert_eq!(approvers, ApproverRole::ALL.to_vec());
    }

    #[test]
    fn terminal_statuses_have_no_approver() {
        for status in LeaveStatus::ALL {
            assert_eq!(status.is_terminal(), status.required_approver().is_none());
        }
        assert!(LeaveStatus::Approved.is_terminal());
        assert!(!LeaveStatus::Approved.is_rejected());
        assert_eq!(
            LeaveStatus::RejectedManagerHo.rejected_by(),
            Some(ApproverRole::ManagerHo)
        );
    }

    #[test]
    fn status_names_parse_back() {
        for status in LeaveStatus::ALL {
            assert_eq!(status.as_str().parse::<LeaveStatus>(), Ok(status));
        }
        assert!("di_proses".parse::<LeaveStatus>().is_err());
    }
}

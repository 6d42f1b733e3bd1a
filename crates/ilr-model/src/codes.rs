//! Type-safe coded values for learner records.
//!
//! Submissions carry most classifications as small integer codes. These
//! types keep the known codes named while preserving any code this crate
//! does not recognise (`Other`), so an unexpected value in a submission is
//! never lost or rejected at parse time; rules decide what it means.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ModelError;

/// Funding model of a learning delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum FundModel {
    /// 10: community learning.
    CommunityLearning,
    /// 25: 16-19 (excluding apprenticeships).
    SixteenToNineteen,
    /// 35: adult skills.
    AdultSkills,
    /// 36: apprenticeships (from 1 May 2017).
    Apprenticeships,
    /// 70: European Social Fund.
    EuropeanSocialFund,
    /// 81: other adult.
    OtherAdult,
    /// 82: other 16-19.
    OtherSixteenToNineteen,
    /// 99: non-funded (no ESFA funding for this learning aim).
    NonFunded,
    /// Any code not listed above.
    Other(u32),
}

impl FundModel {
    pub fn code(self) -> u32 {
        match self {
            FundModel::CommunityLearning => 10,
            FundModel::SixteenToNineteen => 25,
            FundModel::AdultSkills => 35,
            FundModel::Apprenticeships => 36,
            FundModel::EuropeanSocialFund => 70,
            FundModel::OtherAdult => 81,
            FundModel::OtherSixteenToNineteen => 82,
            FundModel::NonFunded => 99,
            FundModel::Other(code) => code,
        }
    }

    /// Returns true for codes this crate recognises.
    pub fn is_known(self) -> bool {
        !matches!(self, FundModel::Other(_))
    }
}

impl From<u32> for FundModel {
    fn from(code: u32) -> Self {
        match code {
            10 => FundModel::CommunityLearning,
            25 => FundModel::SixteenToNineteen,
            35 => FundModel::AdultSkills,
            36 => FundModel::Apprenticeships,
            70 => FundModel::EuropeanSocialFund,
            81 => FundModel::OtherAdult,
            82 => FundModel::OtherSixteenToNineteen,
            99 => FundModel::NonFunded,
            other => FundModel::Other(other),
        }
    }
}

impl From<FundModel> for u32 {
    fn from(value: FundModel) -> Self {
        value.code()
    }
}

impl fmt::Display for FundModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for FundModel {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_code(s, "fund model").map(FundModel::from)
    }
}

/// Aim type of a learning delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum AimType {
    /// 1: programme aim.
    ProgrammeAim,
    /// 3: component learning aim within a programme.
    ComponentAim,
    /// 4: learning aim that is not part of a programme.
    Standalone,
    /// 5: core aim for 16-19 study programmes.
    CoreAim,
    Other(u32),
}

impl AimType {
    pub fn code(self) -> u32 {
        match self {
            AimType::ProgrammeAim => 1,
            AimType::ComponentAim => 3,
            AimType::Standalone => 4,
            AimType::CoreAim => 5,
            AimType::Other(code) => code,
        }
    }
}

impl From<u32> for AimType {
    fn from(code: u32) -> Self {
        match code {
            1 => AimType::ProgrammeAim,
            3 => AimType::ComponentAim,
            4 => AimType::Standalone,
            5 => AimType::CoreAim,
            other => AimType::Other(other),
        }
    }
}

impl From<AimType> for u32 {
    fn from(value: AimType) -> Self {
        value.code()
    }
}

impl fmt::Display for AimType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Programme type code.
///
/// Kept as an open newtype: the set of programme types changes between
/// funding years and classification of a code belongs to the derived-fact
/// layer, not to the record itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgType(pub u32);

impl ProgType {
    pub const ADVANCED_LEVEL_APPRENTICESHIP: ProgType = ProgType(2);
    pub const INTERMEDIATE_LEVEL_APPRENTICESHIP: ProgType = ProgType(3);
    pub const HIGHER_APPRENTICESHIP_LEVEL_4: ProgType = ProgType(20);
    pub const HIGHER_APPRENTICESHIP_LEVEL_5: ProgType = ProgType(21);
    pub const HIGHER_APPRENTICESHIP_LEVEL_6: ProgType = ProgType(22);
    pub const HIGHER_APPRENTICESHIP_LEVEL_7: ProgType = ProgType(23);
    pub const TRAINEESHIP: ProgType = ProgType(24);
    pub const APPRENTICESHIP_STANDARD: ProgType = ProgType(25);
    pub const T_LEVEL: ProgType = ProgType(31);

    pub fn code(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ProgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Completion status of a learning delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum CompletionStatus {
    /// 1: the learner is continuing or intending to continue.
    Continuing,
    /// 2: the learner has completed the learning activities.
    Completed,
    /// 3: the learner has withdrawn.
    Withdrawn,
    /// 6: the learner has temporarily withdrawn due to an agreed break.
    BreakInLearning,
    Other(u32),
}

impl CompletionStatus {
    pub fn code(self) -> u32 {
        match self {
            CompletionStatus::Continuing => 1,
            CompletionStatus::Completed => 2,
            CompletionStatus::Withdrawn => 3,
            CompletionStatus::BreakInLearning => 6,
            CompletionStatus::Other(code) => code,
        }
    }
}

impl From<u32> for CompletionStatus {
    fn from(code: u32) -> Self {
        match code {
            1 => CompletionStatus::Continuing,
            2 => CompletionStatus::Completed,
            3 => CompletionStatus::Withdrawn,
            6 => CompletionStatus::BreakInLearning,
            other => CompletionStatus::Other(other),
        }
    }
}

impl From<CompletionStatus> for u32 {
    fn from(value: CompletionStatus) -> Self {
        value.code()
    }
}

/// Employment status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum EmploymentStatusCode {
    /// 10: in paid employment.
    InPaidEmployment,
    /// 11: not in paid employment, looking for work and available to start.
    NotEmployedLookingForWork,
    /// 12: not in paid employment, not looking for work and/or not available.
    NotEmployedNotLooking,
    /// 98: not known / not provided.
    NotKnown,
    Other(u32),
}

impl EmploymentStatusCode {
    pub fn code(self) -> u32 {
        match self {
            EmploymentStatusCode::InPaidEmployment => 10,
            EmploymentStatusCode::NotEmployedLookingForWork => 11,
            EmploymentStatusCode::NotEmployedNotLooking => 12,
            EmploymentStatusCode::NotKnown => 98,
            EmploymentStatusCode::Other(code) => code,
        }
    }

    /// Returns true for both "not in paid employment" codes.
    pub fn is_not_in_paid_employment(self) -> bool {
        matches!(
            self,
            EmploymentStatusCode::NotEmployedLookingForWork
                | EmploymentStatusCode::NotEmployedNotLooking
        )
    }
}

impl From<u32> for EmploymentStatusCode {
    fn from(code: u32) -> Self {
        match code {
            10 => EmploymentStatusCode::InPaidEmployment,
            11 => EmploymentStatusCode::NotEmployedLookingForWork,
            12 => EmploymentStatusCode::NotEmployedNotLooking,
            98 => EmploymentStatusCode::NotKnown,
            other => EmploymentStatusCode::Other(other),
        }
    }
}

impl From<EmploymentStatusCode> for u32 {
    fn from(value: EmploymentStatusCode) -> Self {
        value.code()
    }
}

impl FromStr for EmploymentStatusCode {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_code(s, "employment status").map(EmploymentStatusCode::from)
    }
}

/// Monitoring marker type and code constants.
pub mod fam {
    /// Restart indicator.
    pub const RESTART: &str = "RES";
    pub const RESTART_CODE: &str = "1";
    /// Learning delivery monitoring.
    pub const LEARNING_DELIVERY_MONITORING: &str = "LDM";
    /// OLASS (offenders in custody) learning delivery monitoring code.
    pub const LDM_CUSTODY: &str = "034";
    /// Advanced learner loan indicator.
    pub const ADVANCED_LEARNER_LOAN: &str = "ADL";
    pub const ADVANCED_LEARNER_LOAN_CODE: &str = "1";
    /// Source of funding.
    pub const SOURCE_OF_FUNDING: &str = "SOF";

    /// Employment monitoring: benefit status indicator.
    pub const BENEFIT_STATUS_INDICATOR: &str = "BSI";

    /// Financial record type: total negotiated price.
    pub const TOTAL_NEGOTIATED_PRICE: &str = "TNP";
}

fn parse_code(s: &str, kind: &'static str) -> Result<u32, ModelError> {
    s.trim().parse::<u32>().map_err(|_| ModelError::InvalidValue {
        kind,
        value: s.to_string(),
    })
}

//! Sale status enumeration and its semantic groups.
//!
//! The status strings are the operational vocabulary of the business and are
//! kept verbatim on the wire (Italian labels). The grouping predicates below
//! are the single source of truth for every component that buckets sales:
//! revenue, commission eligibility, and count exclusions.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a sale. Closed enumeration.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SaleStatus {
    /// Fresh order, nobody has worked it yet.
    #[serde(rename = "In attesa")]
    InAttesa,
    /// Customer reached by customer care.
    Contattato,
    /// Order confirmed, ready for logistics.
    Confermato,
    /// Cancelled by the platform.
    Annullato,
    /// Cancelled by the customer.
    Cancellato,
    /// Parcel handed to the carrier; carries a tracking code.
    Spedito,
    /// Commission released for payment before delivery confirmation.
    Svincolato,
    /// Delivered to the customer.
    Consegnato,
    /// Customer could not be reached.
    #[serde(rename = "Non raggiungibile")]
    NonRaggiungibile,
    /// Parcel refused or never collected.
    #[serde(rename = "Non ritirato")]
    NonRitirato,
    /// Parcel held by the carrier, pending re-contact.
    Giacenza,
    /// Flagged by the duplicate detector. System-assigned only.
    Duplicato,
    /// Synthetic test order. System-assigned only, invisible to reducers.
    Test,
}

impl SaleStatus {
    pub const ALL: [SaleStatus; 13] = [
        SaleStatus::InAttesa,
        SaleStatus::Contattato,
        SaleStatus::Confermato,
        SaleStatus::Annullato,
        SaleStatus::Cancellato,
        SaleStatus::Spedito,
        SaleStatus::Svincolato,
        SaleStatus::Consegnato,
        SaleStatus::NonRaggiungibile,
        SaleStatus::NonRitirato,
        SaleStatus::Giacenza,
        SaleStatus::Duplicato,
        SaleStatus::Test,
    ];

    /// Statuses that count toward revenue.
    pub const fn counts_revenue(self) -> bool {
        !matches!(
            self,
            SaleStatus::Annullato | SaleStatus::Cancellato | SaleStatus::Duplicato | SaleStatus::Test
        )
    }

    /// Statuses where the affiliate commission is payable.
    pub const fn affiliate_commission_approved(self) -> bool {
        matches!(self, SaleStatus::Svincolato | SaleStatus::Consegnato)
    }

    /// Statuses where the affiliate commission is still maturing.
    ///
    /// `Non ritirato` is in neither bucket: the parcel came back, the
    /// commission neither matured nor is it still expected.
    pub const fn affiliate_commission_pending(self) -> bool {
        matches!(
            self,
            SaleStatus::InAttesa
                | SaleStatus::Contattato
                | SaleStatus::Confermato
                | SaleStatus::NonRaggiungibile
                | SaleStatus::Spedito
                | SaleStatus::Giacenza
        )
    }

    /// Statuses where logistics and customer-care commissions are payable.
    /// Only delivery qualifies; `Svincolato` releases the affiliate
    /// commission but not the handling ones.
    pub const fn handling_commission_approved(self) -> bool {
        matches!(self, SaleStatus::Consegnato)
    }

    /// Statuses where logistics and customer-care commissions are still
    /// maturing: every live order that has not yet been delivered.
    pub const fn handling_commission_pending(self) -> bool {
        self.counts_revenue() && !self.handling_commission_approved()
    }

    /// Statuses excluded from sale counts (leaderboards, approval rates).
    pub const fn excluded_from_counts(self) -> bool {
        matches!(
            self,
            SaleStatus::Duplicato | SaleStatus::Cancellato | SaleStatus::Annullato
        )
    }

    /// Statuses only the system may assign; never a legal manual transition.
    pub const fn system_assigned(self) -> bool {
        matches!(self, SaleStatus::Duplicato | SaleStatus::Test)
    }

    /// The operational label, identical to the wire form.
    pub const fn label(self) -> &'static str {
        match self {
            SaleStatus::InAttesa => "In attesa",
            SaleStatus::Contattato => "Contattato",
            SaleStatus::Confermato => "Confermato",
            SaleStatus::Annullato => "Annullato",
            SaleStatus::Cancellato => "Cancellato",
            SaleStatus::Spedito => "Spedito",
            SaleStatus::Svincolato => "Svincolato",
            SaleStatus::Consegnato => "Consegnato",
            SaleStatus::NonRaggiungibile => "Non raggiungibile",
            SaleStatus::NonRitirato => "Non ritirato",
            SaleStatus::Giacenza => "Giacenza",
            SaleStatus::Duplicato => "Duplicato",
            SaleStatus::Test => "Test",
        }
    }
}

impl core::fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

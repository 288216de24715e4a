use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::deal::input::{
    rebalance, DealInput, InvestorId, LoanBasis, PurchaseTaxScheme, RenovationVatScheme,
    RentalModel, TaxSubject,
};
use crate::types::{Money, Percent, SquareMetres};

/// One edit to a deal, tagged by logical field group.
///
/// The editing surface applies these instead of assigning fields by name,
/// so a typo'd field is a compile error rather than a silent runtime miss.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DealUpdate {
    Purchase(PurchaseUpdate),
    Renovation(RenovationUpdate),
    Disposition(DispositionUpdate),
    Rental(RentalUpdate),
    LoanBasis(LoanBasis),
    Investor {
        id: InvestorId,
        update: InvestorUpdate,
    },
    /// Resize the investor list, rebalancing shares evenly
    InvestorCount(usize),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PurchaseUpdate {
    PropertyValue(Money),
    TaxScheme(PurchaseTaxScheme),
    NotaryFees(Money),
    RegistryFees(Money),
    AgencyFees(Money),
    BrokerageFees(Money),
    SetupElectricity(bool),
    SetupWater(bool),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RenovationUpdate {
    AreaSqm(SquareMetres),
    RenovationCostPerSqm(Money),
    FurnitureCostPerSqm(Money),
    ContingencyRate(Percent),
    GeneralExpenses(Money),
    TechnicalFees(Money),
    VatScheme(RenovationVatScheme),
    IcioRate(Percent),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DispositionUpdate {
    SalePrice(Money),
    CapitalGainsTaxRate(Percent),
    CeeCost(Money),
    NotarySaleCost(Money),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RentalUpdate {
    Model(RentalModel),
    MonthlyRent(Money),
    NumberOfRooms(u32),
    RentPerRoom(Money),
    IbiFee(Money),
    InsuranceFee(Money),
    IncludeManagementFee(bool),
    IncludeCleaningFee(bool),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum InvestorUpdate {
    /// Negative entries clamp to 0, matching the form's behaviour
    Participation(Percent),
    TaxSubject(TaxSubject),
    FinancingPct(Percent),
    LoanInterestRate(Percent),
    AssociatedCostsRate(Percent),
}

/// Apply one edit in place. Edits addressed to an unknown investor id are
/// a no-op.
pub fn apply(input: &mut DealInput, update: DealUpdate) {
    match update {
        DealUpdate::Purchase(u) => apply_purchase(input, u),
        DealUpdate::Renovation(u) => apply_renovation(input, u),
        DealUpdate::Disposition(u) => apply_disposition(input, u),
        DealUpdate::Rental(u) => apply_rental(input, u),
        DealUpdate::LoanBasis(basis) => input.loan_basis = basis,
        DealUpdate::Investor { id, update } => {
            if let Some(investor) = input.investors.iter_mut().find(|inv| inv.id == id) {
                match update {
                    InvestorUpdate::Participation(p) => {
                        investor.participation = p.max(Decimal::ZERO)
                    }
                    InvestorUpdate::TaxSubject(t) => investor.tax_subject = t,
                    InvestorUpdate::FinancingPct(f) => investor.financing_pct = f,
                    InvestorUpdate::LoanInterestRate(r) => investor.loan_interest_rate = r,
                    InvestorUpdate::AssociatedCostsRate(r) => investor.associated_costs_rate = r,
                }
            }
        }
        DealUpdate::InvestorCount(count) => {
            input.investors = rebalance(&input.investors, count);
        }
    }
}

fn apply_purchase(input: &mut DealInput, update: PurchaseUpdate) {
    match update {
        PurchaseUpdate::PropertyValue(v) => input.property_value = v,
        PurchaseUpdate::TaxScheme(s) => input.purchase_tax_scheme = s,
        PurchaseUpdate::NotaryFees(v) => input.notary_fees = v,
        PurchaseUpdate::RegistryFees(v) => input.registry_fees = v,
        PurchaseUpdate::AgencyFees(v) => input.agency_fees = v,
        PurchaseUpdate::BrokerageFees(v) => input.brokerage_fees = v,
        PurchaseUpdate::SetupElectricity(b) => input.setup_electricity = b,
        PurchaseUpdate::SetupWater(b) => input.setup_water = b,
    }
}

fn apply_renovation(input: &mut DealInput, update: RenovationUpdate) {
    match update {
        RenovationUpdate::AreaSqm(v) => input.area_sqm = v,
        RenovationUpdate::RenovationCostPerSqm(v) => input.renovation_cost_per_sqm = v,
        RenovationUpdate::FurnitureCostPerSqm(v) => input.furniture_cost_per_sqm = v,
        RenovationUpdate::ContingencyRate(v) => input.contingency_rate = v,
        RenovationUpdate::GeneralExpenses(v) => input.general_expenses = v,
        RenovationUpdate::TechnicalFees(v) => input.technical_fees = v,
        RenovationUpdate::VatScheme(s) => input.renovation_vat_scheme = s,
        RenovationUpdate::IcioRate(v) => input.icio_rate = v,
    }
}

fn apply_disposition(input: &mut DealInput, update: DispositionUpdate) {
    match update {
        DispositionUpdate::SalePrice(v) => input.sale_price = v,
        DispositionUpdate::CapitalGainsTaxRate(v) => input.capital_gains_tax_rate = v,
        DispositionUpdate::CeeCost(v) => input.cee_cost = v,
        DispositionUpdate::NotarySaleCost(v) => input.notary_sale_cost = v,
    }
}

fn apply_rental(input: &mut DealInput, update: RentalUpdate) {
    match update {
        RentalUpdate::Model(m) => input.rental_model = m,
        RentalUpdate::MonthlyRent(v) => input.monthly_rent = v,
        RentalUpdate::NumberOfRooms(n) => input.number_of_rooms = n,
        RentalUpdate::RentPerRoom(v) => input.rent_per_room = v,
        RentalUpdate::IbiFee(v) => input.ibi_fee = v,
        RentalUpdate::InsuranceFee(v) => input.insurance_fee = v,
        RentalUpdate::IncludeManagementFee(b) => input.include_management_fee = b,
        RentalUpdate::IncludeCleaningFee(b) => input.include_cleaning_fee = b,
    }
}

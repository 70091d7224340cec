use pipenet_core::HierarchySelector;

use super::predicate::Predicate;

pub fn hierarchy_predicate(selector: HierarchySelector) -> Predicate {
    match selector {
        HierarchySelector::Satellite(id) => Predicate::SatelliteIs(id),
        HierarchySelector::NoSatellite => Predicate::SatelliteIsNull,
        HierarchySelector::Facility(id) => Predicate::FacilityIs(id),
        // Segments without a satellite have no facility either, but are not listed here.
        HierarchySelector::NoFacility => Predicate::SatelliteWithoutFacility,
        HierarchySelector::All => Predicate::Always,
    }
}

//! Standard fixture data and search catalog
//!
//! Four data sources of synthetic people, loaded by the external repository
//! manager, and the attribute searches run against them with the counts the
//! engine is expected to return per result type.

use search_types::{RecordId, ResultType};

use crate::criteria::{criterion, Criterion, SearchCriteria};
use crate::fixtures::{relationship_key, FixtureTable};
use crate::scenario::{ExpectedCounts, SearchGroup};

pub const PASSENGERS: &str = "PASSENGERS";
pub const EMPLOYEES: &str = "EMPLOYEES";
pub const VIPS: &str = "VIPS";
pub const MARRIAGES: &str = "MARRIAGES";

/// Data sources in load order
pub const DATA_SOURCES: [&str; 4] = [PASSENGERS, EMPLOYEES, VIPS, MARRIAGES];

const PERSON_HEADERS: [&str; 6] = [
    "RECORD_ID",
    "NAME_FIRST",
    "NAME_LAST",
    "PHONE_NUMBER",
    "ADDR_FULL",
    "DATE_OF_BIRTH",
];

fn person_headers<'a>(extra: &[&'a str]) -> Vec<&'a str> {
    PERSON_HEADERS.iter().copied().chain(extra.iter().copied()).collect()
}

#[rustfmt::skip]
pub fn passengers() -> FixtureTable {
    FixtureTable::new(PASSENGERS, "test-passengers-", PERSON_HEADERS)
        .row(["ABC123", "Joe", "Schmoe", "702-555-1212", "101 Main Street, Las Vegas, NV 89101", "1981-01-12"])
        .row(["DEF456", "Joanne", "Smith", "212-555-1212", "101 Fifth Ave, Las Vegas, NV 10018", "1983-05-15"])
        .row(["GHI789", "John", "Doe", "818-555-1313", "100 Main Street, Los Angeles, CA 90012", "1978-10-17"])
        .row(["JKL012", "Jane", "Doe", "818-555-1212", "100 Main Street, Los Angeles, CA 90012", "1979-02-05"])
}

#[rustfmt::skip]
pub fn employees() -> FixtureTable {
    FixtureTable::new(
        EMPLOYEES,
        "test-employees-",
        person_headers(&["MOTHERS_MAIDEN_NAME", "SSN_NUMBER"]),
    )
    .row(["MNO345", "Joseph", "Schmoe", "702-555-1212", "101 Main Street, Las Vegas, NV 89101", "1981-01-12", "WILSON", "145-45-9866"])
    .row(["PQR678", "Jo Anne", "Smith", "212-555-1212", "101 Fifth Ave, Las Vegas, NV 10018", "1983-05-15", "JACOBS", "213-98-9374"])
    .row(["ZYX321", "Mark", "Hightower", "563-927-2833", "1882 Meadows Lane, Las Vegas, NV 89125", "1981-06-22", "JENKINS", "873-22-4213"])
    .row(["CBA654", "Mark", "Hightower", "781-332-2824", "2121 Roscoe Blvd, Los Angeles, CA 90232", "1980-09-09", "BROOKS", "827-27-4829"])
}

#[rustfmt::skip]
pub fn vips() -> FixtureTable {
    FixtureTable::new(VIPS, "test-vips-", person_headers(&["MOTHERS_MAIDEN_NAME"]))
        .row(["STU901", "John", "Doe", "818-555-1313", "100 Main Street, Los Angeles, CA 90012", "1978-10-17", "GREEN"])
        .row(["XYZ234", "Jane", "Doe", "818-555-1212", "100 Main Street, Los Angeles, CA 90012", "1979-02-05", "GRAHAM"])
}

#[rustfmt::skip]
pub fn marriages() -> FixtureTable {
    let bcd123 = RecordId::new(MARRIAGES, "BCD123");
    let cde456 = RecordId::new(MARRIAGES, "CDE456");
    let efg789 = RecordId::new(MARRIAGES, "EFG789");
    let fgh012 = RecordId::new(MARRIAGES, "FGH012");
    let wayne = relationship_key(&bcd123, &cde456);
    let allen = relationship_key(&efg789, &fgh012);

    FixtureTable::new(
        MARRIAGES,
        "test-marriages-",
        [
            "RECORD_ID",
            "NAME_FULL",
            "AKA_NAME_FULL",
            "PHONE_NUMBER",
            "ADDR_FULL",
            "MARRIAGE_DATE",
            "DATE_OF_BIRTH",
            "GENDER",
            "RELATIONSHIP_TYPE",
            "RELATIONSHIP_ROLE",
            "RELATIONSHIP_KEY",
        ],
    )
    .row([bcd123.record_id.as_str(), "Bruce Wayne", "Batman", "201-765-3451", "101 Wayne Manor Rd; Gotham City, NJ 07017", "2008-06-05", "1971-09-08", "M", "SPOUSE", "HUSBAND", wayne.as_str()])
    .row([cde456.record_id.as_str(), "Selina Kyle", "Catwoman", "201-875-2314", "101 Wayne Manor Rd; Gotham City, NJ 07017", "2008-06-05", "1981-12-05", "F", "SPOUSE", "WIFE", wayne.as_str()])
    .row([efg789.record_id.as_str(), "Barry Allen", "The Flash", "330-982-2133", "1201 Main Street; Star City, OH 44308", "2014-11-07", "1986-03-04", "M", "SPOUSE", "HUSBAND", allen.as_str()])
    .row([fgh012.record_id.as_str(), "Iris West-Allen", "", "330-675-1231", "1201 Main Street; Star City, OH 44308", "2014-11-07", "1986-05-14", "F", "SPOUSE", "WIFE", allen.as_str()])
}

/// All fixture tables in load order
pub fn fixture_tables() -> Vec<FixtureTable> {
    vec![passengers(), employees(), vips(), marriages()]
}

fn la_address() -> [Criterion; 4] {
    [
        criterion("ADDR_LINE1", ["100 MAIN STREET"]),
        criterion("ADDR_CITY", ["LOS ANGELES"]),
        criterion("ADDR_STATE", ["CALIFORNIA"]),
        criterion("ADDR_POSTAL_CODE", ["90012"]),
    ]
}

fn group(criteria: SearchCriteria, counts: &[(ResultType, u32)]) -> SearchGroup {
    SearchGroup::new(criteria, ExpectedCounts::new(counts.iter().copied()))
}

/// The standard attribute searches, in sweep order
pub fn search_groups() -> Vec<SearchGroup> {
    use ResultType::{Match, NameOnlyMatch, PossibleMatch, PossibleRelation};

    let phone = |values: &[&str]| SearchCriteria::single("PHONE_NUMBER", values.iter().copied());
    let with_address = |first: Criterion| {
        SearchCriteria::from_criteria(std::iter::once(first).chain(la_address()))
    };

    vec![
        group(phone(&["702-555-1212"]), &[(PossibleRelation, 1)]),
        group(phone(&["212-555-1212"]), &[(PossibleRelation, 1)]),
        group(phone(&["818-555-1313"]), &[(PossibleRelation, 1)]),
        group(phone(&["818-555-1212"]), &[(PossibleRelation, 1)]),
        group(phone(&["818-555-1212", "818-555-1313"]), &[(PossibleRelation, 2)]),
        group(SearchCriteria::from_criteria(la_address()), &[(PossibleRelation, 2)]),
        group(
            with_address(criterion("NAME_FULL", ["JOHN DOE", "JANE DOE"])),
            &[(Match, 2)],
        ),
        group(
            with_address(criterion("NAME_FULL", ["JOHN DOE"])),
            &[(Match, 1), (PossibleRelation, 1)],
        ),
        group(
            SearchCriteria::from_criteria([
                criterion("NAME_FULL", ["Mark Hightower"]),
                criterion("PHONE_NUMBER", ["563-927-2833"]),
            ]),
            &[(Match, 1), (NameOnlyMatch, 1)],
        ),
        group(
            SearchCriteria::from_criteria([
                criterion("NAME_FULL", ["Mark Hightower"]),
                criterion("DATE_OF_BIRTH", ["1981-03-22"]),
            ]),
            &[(PossibleMatch, 1)],
        ),
        group(
            SearchCriteria::from_criteria([
                criterion("NAME_FULL", ["Mark Hightower"]),
                criterion("PHONE_NUMBER", ["563-927-2833"]),
                criterion("PHONE_NUMBER", ["781-332-2824"]),
                criterion("DATE_OF_BIRTH", ["1981-06-22"]),
            ]),
            &[(Match, 1), (PossibleMatch, 1)],
        ),
    ]
}

//! Canonical field schemas per table.
//!
//! The widget receives these as its mapping targets, and the preview uses
//! their order for columns. Lookup is total: unknown tables get
//! [`DEFAULT_FIELDS`] so the widget can always be launched.

use crate::models::{FieldDefinition, TableType};

const fn f(label: &'static str, key: &'static str) -> FieldDefinition {
    FieldDefinition::new(label, key)
}

pub const CLIENT_FIELDS: &[FieldDefinition] = &[
    f("First name", "firstName"),
    f("Last name", "lastName"),
    f("National ID", "nationalId"),
    f("Phone", "phone"),
    f("Email", "email"),
    f("Farm name", "farmName"),
    f("Address", "address"),
    f("Municipality", "municipality"),
    f("Department", "department"),
    f("Herd size", "herdSize"),
];

pub const ANIMAL_FIELDS: &[FieldDefinition] = &[
    f("Client ID", "clientId"),
    f("Tag number", "tagNumber"),
    f("Name", "name"),
    f("Species", "species"),
    f("Breed", "breed"),
    f("Sex", "sex"),
    f("Birth date", "birthDate"),
    f("Weight (kg)", "weight"),
];

pub const VACCINATION_FIELDS: &[FieldDefinition] = &[
    f("Client ID", "clientId"),
    f("Animal tag", "animalTag"),
    f("Vaccine", "vaccine"),
    f("Batch number", "batchNumber"),
    f("Dose (ml)", "dose"),
    f("Application date", "applicationDate"),
    f("Next dose date", "nextDoseDate"),
    f("Veterinarian", "veterinarian"),
    f("Notes", "notes"),
];

pub const PARASITE_CONTROL_FIELDS: &[FieldDefinition] = &[
    f("Client ID", "clientId"),
    f("Animal tag", "animalTag"),
    f("Product", "product"),
    f("Active ingredient", "activeIngredient"),
    f("Parasite type", "parasiteType"),
    f("Dose", "dose"),
    f("Application date", "applicationDate"),
    f("Next application", "nextApplicationDate"),
    f("Veterinarian", "veterinarian"),
];

pub const LABORATORY_FIELDS: &[FieldDefinition] = &[
    f("Client ID", "clientId"),
    f("Animal tag", "animalTag"),
    f("Sample type", "sampleType"),
    f("Test", "testName"),
    f("Sample date", "sampleDate"),
    f("Result date", "resultDate"),
    f("Result", "result"),
    f("Laboratory", "laboratory"),
    f("Observations", "observations"),
];

pub const EQUINE_FIELDS: &[FieldDefinition] = &[
    f("Client ID", "clientId"),
    f("Horse name", "horseName"),
    f("Microchip", "microchip"),
    f("Breed", "breed"),
    f("Sex", "sex"),
    f("Birth date", "birthDate"),
    f("Coat color", "coatColor"),
    f("Procedure", "procedure"),
    f("Procedure date", "procedureDate"),
    f("Veterinarian", "veterinarian"),
];

pub const INVENTORY_FIELDS: &[FieldDefinition] = &[
    f("Product code", "productCode"),
    f("Product name", "productName"),
    f("Category", "category"),
    f("Batch number", "batchNumber"),
    f("Expiry date", "expiryDate"),
    f("Quantity", "quantity"),
    f("Unit", "unit"),
    f("Unit cost", "unitCost"),
    f("Supplier", "supplier"),
];

/// Fallback schema for unrecognized or legacy tables.
pub const DEFAULT_FIELDS: &[FieldDefinition] = &[
    f("Name", "name"),
    f("Description", "description"),
    f("Date", "date"),
    f("Notes", "notes"),
];

/// Ordered field definitions for a table. Never empty.
pub fn fields_for(table_type: &TableType) -> &'static [FieldDefinition] {
    match table_type {
        TableType::Clients => CLIENT_FIELDS,
        TableType::Animals => ANIMAL_FIELDS,
        TableType::Vaccinations => VACCINATION_FIELDS,
        TableType::ParasiteControl => PARASITE_CONTROL_FIELDS,
        TableType::Laboratory => LABORATORY_FIELDS,
        TableType::Equine => EQUINE_FIELDS,
        TableType::Inventory => INVENTORY_FIELDS,
        TableType::Other(name) => {
            log::debug!("No schema for table '{}', using default fields", name);
            DEFAULT_FIELDS
        }
    }
}

/// Field keys in schema order.
pub fn field_keys(table_type: &TableType) -> Vec<&'static str> {
    fields_for(table_type).iter().map(|f| f.key).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_table_has_fields() {
        for table in TableType::all() {
            assert!(!fields_for(table).is_empty(), "{} has no fields", table);
        }
    }

    #[test]
    fn test_unknown_table_gets_default() {
        let fields = fields_for(&TableType::parse("old_visits_2019"));
        assert_eq!(fields, DEFAULT_FIELDS);
        assert!(!fields.is_empty());
    }

    #[test]
    fn test_keys_are_unique_per_table() {
        for table in TableType::all() {
            let keys = field_keys(table);
            let unique: HashSet<_> = keys.iter().collect();
            assert_eq!(unique.len(), keys.len(), "duplicate key in {}", table);
        }
    }

    #[test]
    fn test_order_is_stable() {
        let keys = field_keys(&TableType::Vaccinations);
        assert_eq!(&keys[..3], &["clientId", "animalTag", "vaccine"]);
    }
}

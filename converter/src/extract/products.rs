//! `Linear Products.csv` and `Replay Products.csv`.
//!
//! Both files open with a title line and a header line; every following
//! row is `productId ; edsProductId ; ...`.

use crate::config::ConvertOptions;
use crate::error::ExtractResult;
use crate::models::Product;
use crate::parser::read_rows;

const HEADER_LINES: usize = 2;

pub fn read_linear_products(options: &ConvertOptions) -> ExtractResult<Vec<Product>> {
    read_products(options, &options.files.linear_products)
}

pub fn read_replay_products(options: &ConvertOptions) -> ExtractResult<Vec<Product>> {
    read_products(options, &options.files.replay_products)
}

fn read_products(options: &ConvertOptions, file: &str) -> ExtractResult<Vec<Product>> {
    let rows = read_rows(&options.input_path(file), options.delimiter, HEADER_LINES)?;

    Ok(rows
        .iter()
        .filter_map(|row| {
            Some(Product {
                id: row.cell(0)?.to_string(),
                eds_id: row.cell(1).map(str::to_string),
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::testutil::input_dir;

    #[test]
    fn test_two_header_lines_skipped() {
        let csv = "Linear products;;;;\n\
            ProductId;EDSProductId;Price;Duration;Description\n\
            LP1;EDS-1;9.99;30;Basic\n\
            \n\
            LP2;EDS-2;;;\n";
        let (_dir, options) = input_dir(&[("Linear Products.csv", csv)]);
        let products = read_linear_products(&options).unwrap();

        assert_eq!(
            products,
            vec![
                Product { id: "LP1".into(), eds_id: Some("EDS-1".into()) },
                Product { id: "LP2".into(), eds_id: Some("EDS-2".into()) },
            ]
        );
    }

    #[test]
    fn test_replay_products_single_column_row() {
        let csv = "Replay products\nProductID;EDSProductID\nRP1;EDS-R1\nRP2\n";
        let (_dir, options) = input_dir(&[("Replay Products.csv", csv)]);
        let products = read_replay_products(&options).unwrap();

        assert_eq!(products.len(), 2);
        assert_eq!(products[1].id, "RP2");
        assert_eq!(products[1].eds_id, None);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let (_dir, options) = input_dir(&[]);
        assert!(read_replay_products(&options).unwrap().is_empty());
    }
}

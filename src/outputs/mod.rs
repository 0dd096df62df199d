//! Output writers.
//!
//! - [`records`]: the CSV file every extracted article is appended to
//! - [`json`]: the optional JSON benchmark report
//!
//! ```text
//! rmrb_data.csv
//! url,title,date,content,content_length
//! http://paper.people.com.cn/rmrb/html/2023-01/01/nw.D110000renmrb_20230101_1-01.htm,...
//! ```

pub mod json;
pub mod records;

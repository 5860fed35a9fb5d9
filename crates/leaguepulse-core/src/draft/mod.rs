// Draft records and draft quality grading.

pub mod grade;
pub mod grader;
pub mod pick;

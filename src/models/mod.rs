pub mod department;
pub mod employee;
pub mod ownership;
pub mod salary;
pub mod user;

pub use department::{Department, DepartmentChange};
pub use employee::{Employee, EmployeeProfile, Gender, NewEmployee};
pub use ownership::{Owned, Owner, Principal};
pub use salary::{NewSalary, PayFigures, Salary, SalaryRecord};
pub use user::{NewUser, User, UserId};
